//! Capture Worker: a single dedicated thread that orchestrates
//! V4L2 source → hardware decoder → color converter → frame exchange,
//! and reports a final averaged timing summary on stop.
//!
//! Grounded in `original_source/native/v4l2_mpp_camera/v4l2_mpp_camera.c`'s
//! capture thread, which requests `SCHED_FIFO` at the maximum priority and
//! continues with the default scheduler if the kernel refuses it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rockchip_mpp::HardwareDecoder;
use rockchip_rga::YuvSemiplanarFormat;
use v4l2_source::{DequeueOutcome, V4l2Source};

use crate::error::{Result, SmartScopeError};
use crate::exchange::FrameExchange;

const FD_WAIT_TIMEOUT: Duration = Duration::from_millis(33);

/// Callback invoked with a pointer into the currently-published BGRA slot
/// plus its dimensions, once per successfully decoded and converted frame.
pub type FrameCallback = Box<dyn Fn(&[u8], u32, u32) + Send>;

#[derive(Default, Clone, Copy)]
struct SpanTotals {
    capture_wait: Duration,
    decode: Duration,
    convert: Duration,
    callback: Duration,
    total: Duration,
    frames: u64,
}

pub struct CaptureWorker {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Spawns the worker thread. Idempotent: a second `start` while already
    /// running is a no-op.
    pub fn start(
        &mut self,
        device: PathBuf,
        width: u32,
        height: u32,
        fps: u32,
        exchange: Arc<FrameExchange>,
        callback: Option<FrameCallback>,
    ) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let running = Arc::clone(&self.running);
        let handle = std::thread::spawn(move || {
            request_realtime_priority();
            if let Err(e) = run_loop(device, width, height, fps, &running, &exchange, callback.as_deref()) {
                tracing::error!("capture worker exited with error: {e}");
            }
            running.store(false, Ordering::SeqCst);
        });
        self.thread = Some(handle);
        Ok(())
    }

    /// Signals the loop to exit and joins the thread. In-flight decodes
    /// complete before the thread returns. Idempotent.
    pub fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            handle
                .join()
                .map_err(|_| SmartScopeError::Worker("capture thread panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Default for CaptureWorker {
    fn default() -> Self {
        Self::new()
    }
}

/// `SCHED_FIFO` at the maximum priority, matching the capture thread in
/// `v4l2_mpp_camera.c`. A refusal (no `CAP_SYS_NICE`, container limits,
/// …) is logged and the thread continues at the default policy.
fn request_realtime_priority() {
    unsafe {
        let priority = libc::sched_get_priority_max(libc::SCHED_FIFO);
        let param = libc::sched_param {
            sched_priority: priority,
        };
        let ret = libc::pthread_setschedparam(
            libc::pthread_self(),
            libc::SCHED_FIFO,
            &param as *const _,
        );
        if ret != 0 {
            tracing::warn!("failed to set SCHED_FIFO priority ({ret}), continuing with default scheduling");
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_loop(
    device: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    running: &AtomicBool,
    exchange: &FrameExchange,
    callback: Option<&(dyn Fn(&[u8], u32, u32) + Send)>,
) -> Result<()> {
    let mut source = V4l2Source::open(&device, width, height, fps)?;
    source.start()?;

    let mut decoder = HardwareDecoder::init(
        (source.width() * source.height()) as usize,
        (align_up(source.width(), 16) * align_up(source.height(), 16) * 4) as usize,
    )?;
    decoder.try_enable_fast_out().unwrap_or_else(|e| {
        tracing::warn!("fast-out not honored by the decoder framework: {e}, continuing with defaults");
    });

    let mut totals = SpanTotals::default();
    let mut dst = vec![0u8; (source.width() * source.height() * 4) as usize];

    while running.load(Ordering::Relaxed) {
        let loop_start = Instant::now();

        let capture_wait_start = Instant::now();
        let outcome = source.dequeue(FD_WAIT_TIMEOUT)?;
        totals.capture_wait += capture_wait_start.elapsed();

        let (buffer_index, bytes_used) = match outcome {
            DequeueOutcome::Timeout => continue,
            DequeueOutcome::Frame {
                buffer_index,
                bytes_used,
            } => (buffer_index, bytes_used),
        };
        totals.frames += 1;

        if bytes_used > 0 {
            let packet = source.buffer(buffer_index).to_vec();

            let decode_start = Instant::now();
            let decode_result = decoder.decode(&packet, |frame| {
                (
                    frame.fd(),
                    frame.data().to_vec(),
                    frame.hor_stride(),
                    frame.ver_stride(),
                    frame.format(),
                )
            });
            totals.decode += decode_start.elapsed();

            if let Ok((fd, yuv, hor_stride, ver_stride, format)) = decode_result {
                if let Ok(fd) = fd {
                    let format = match map_pixel_format(format) {
                        Some(format) => format,
                        None => {
                            tracing::warn!(
                                "decoder produced an unsupported pixel format ({:?}), dropping frame",
                                format
                            );
                            source.requeue(buffer_index)?;
                            totals.total += loop_start.elapsed();
                            continue;
                        }
                    };

                    let convert_start = Instant::now();
                    let chroma_offset = (hor_stride * ver_stride) as usize;
                    let chroma = if chroma_offset < yuv.len() {
                        &yuv[chroma_offset..]
                    } else {
                        &[][..]
                    };
                    rockchip_rga::convert_yuv_to_bgra(
                        fd,
                        &yuv[..chroma_offset.min(yuv.len())],
                        chroma,
                        format,
                        source.width(),
                        source.height(),
                        hor_stride,
                        ver_stride,
                        &mut dst,
                        source.width() * 4,
                    );
                    totals.convert += convert_start.elapsed();

                    exchange.publish(&dst, source.width(), source.height());

                    let callback_start = Instant::now();
                    if let Some(cb) = callback {
                        if let Some((published, w, h)) = exchange.read() {
                            cb(&published, w, h);
                        }
                    }
                    totals.callback += callback_start.elapsed();
                }
            } else {
                tracing::warn!("decode failed for this packet, dropping frame");
            }
        }

        // Always requeue, even when decode failed, to keep the kernel ring full.
        source.requeue(buffer_index)?;

        totals.total += loop_start.elapsed();
    }

    source.stop()?;
    log_span_summary(&totals);
    Ok(())
}

fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

/// Maps the decoder's reported pixel format onto the layout the RGA/CPU
/// color converter understands. `None` means the hardware produced a
/// format the converter has no case for (packed YUV, RGB, FBC, …).
fn map_pixel_format(format: rockchip_mpp::PixelFormat) -> Option<YuvSemiplanarFormat> {
    match format {
        rockchip_mpp::PixelFormat::Nv12 => Some(YuvSemiplanarFormat::Nv12),
        rockchip_mpp::PixelFormat::Nv21 => Some(YuvSemiplanarFormat::Nv21),
        rockchip_mpp::PixelFormat::Nv16 => Some(YuvSemiplanarFormat::Nv16),
        rockchip_mpp::PixelFormat::Nv61 => Some(YuvSemiplanarFormat::Nv61),
        rockchip_mpp::PixelFormat::Other(_) => None,
    }
}

fn log_span_summary(totals: &SpanTotals) {
    if totals.frames == 0 {
        tracing::info!("capture worker stopped with no frames processed");
        return;
    }
    let avg = |d: Duration| d.as_secs_f64() * 1000.0 / totals.frames as f64;
    tracing::info!(
        frames = totals.frames,
        avg_capture_wait_ms = avg(totals.capture_wait),
        avg_decode_ms = avg(totals.decode),
        avg_convert_ms = avg(totals.convert),
        avg_callback_ms = avg(totals.callback),
        avg_total_ms = avg(totals.total),
        "capture worker stopped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_up_to_the_next_multiple() {
        assert_eq!(align_up(640, 16), 640);
        assert_eq!(align_up(641, 16), 656);
        assert_eq!(align_up(0, 16), 0);
    }

    #[test]
    fn start_stop_is_idempotent_without_a_real_device() {
        let mut worker = CaptureWorker::new();
        assert!(!worker.is_running());
        // stop() before start() must not panic or hang.
        worker.stop().unwrap();
        assert!(worker.stop().is_ok());
    }

    #[test]
    fn map_pixel_format_covers_all_four_semiplanar_layouts() {
        assert_eq!(map_pixel_format(rockchip_mpp::PixelFormat::Nv12), Some(YuvSemiplanarFormat::Nv12));
        assert_eq!(map_pixel_format(rockchip_mpp::PixelFormat::Nv21), Some(YuvSemiplanarFormat::Nv21));
        assert_eq!(map_pixel_format(rockchip_mpp::PixelFormat::Nv16), Some(YuvSemiplanarFormat::Nv16));
        assert_eq!(map_pixel_format(rockchip_mpp::PixelFormat::Nv61), Some(YuvSemiplanarFormat::Nv61));
    }

    #[test]
    fn map_pixel_format_rejects_unrecognized_formats() {
        assert_eq!(map_pixel_format(rockchip_mpp::PixelFormat::Other(0xdead)), None);
    }
}
