//! Low-level V4L2 capture source.
//!
//! Wraps the `linuxvideo` crate's capture device and stream with the
//! open/start/dequeue/requeue/stop/close contract the capture worker
//! expects. MJPEG is the only pixel format negotiated; a driver that
//! returns a different one is treated as unsupported rather than silently
//! reinterpreted.

use std::os::fd::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::time::Duration;

use linuxvideo::format::{PixFormat, PixelFormat};
use linuxvideo::stream::ReadStream;
use linuxvideo::{CaptureDevice, Device};
use log::{info, warn};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::error::{CameraError, CameraResult};

/// Number of local buffer slots the worker round-robins over. Mirrors the
/// V4L2 buffer count requested from the driver (`original_source`'s
/// `v4l2_mpp_camera.c` uses the same value for its `REQBUFS` call).
pub const V4L2_BUFFER_COUNT: usize = 4;

/// Outcome of a single [`V4l2Source::dequeue`] call.
#[derive(Debug)]
pub enum DequeueOutcome {
    /// A frame landed in the given local slot; `bytes_used` is the valid
    /// prefix of [`V4l2Source::buffer`].
    Frame { buffer_index: usize, bytes_used: usize },
    /// No frame was ready within the requested timeout. Not an error: the
    /// worker treats this exactly like it treats a DQBUF EAGAIN.
    Timeout,
}

enum State {
    Idle,
    Capturing {
        stream: ReadStream,
        fd: RawFd,
    },
}

/// A single V4L2 capture device, negotiated once at [`open`](Self::open)
/// and streamed through repeated [`dequeue`](Self::dequeue)/
/// [`requeue`](Self::requeue) calls.
///
/// `linuxvideo` re-queues the underlying kernel buffer automatically when
/// the borrowed frame view from `ReadStream::dequeue` is dropped, so the
/// kernel-buffer lifecycle itself is not exposed here. This wrapper keeps
/// its own fixed pool of [`V4L2_BUFFER_COUNT`] local copy buffers on top
/// of that, round-robined the same way the spec's buffer-index contract
/// expects, so callers still see explicit ownership handoff.
pub struct V4l2Source {
    device_path: PathBuf,
    capture: Option<CaptureDevice>,
    state: State,
    width: u32,
    height: u32,
    slots: Vec<Vec<u8>>,
    slot_busy: Vec<bool>,
    next_slot: usize,
}

impl V4l2Source {
    /// Opens `device` non-blocking, negotiates MJPEG at `width`x`height`,
    /// and requests a best-effort frame interval of `1/fps`. Does not yet
    /// allocate kernel buffers or start streaming; see [`start`](Self::start).
    pub fn open(device: &Path, width: u32, height: u32, fps: u32) -> CameraResult<Self> {
        let dev = Device::open(device).map_err(|e| {
            warn!("failed to open {}: {e}", device.display());
            CameraError::DeviceNotFound(format!("{}: {e}", device.display()))
        })?;

        let requested = PixFormat::new(width, height, PixelFormat::MJPG);
        let capture = dev.video_capture(requested).map_err(|e| {
            warn!("{} rejected capture setup: {e}", device.display());
            CameraError::DeviceOperationFailed(format!("video_capture: {e}"))
        })?;

        let negotiated = capture.format();
        if negotiated.pixelformat() != PixelFormat::MJPG {
            warn!(
                "{} negotiated pixel format {:?}, expected MJPG",
                device.display(),
                negotiated.pixelformat()
            );
            return Err(CameraError::NotSupported(format!(
                "driver returned pixel format {:?}",
                negotiated.pixelformat()
            )));
        }

        let (neg_w, neg_h) = (negotiated.width(), negotiated.height());
        if (neg_w, neg_h) != (width, height) {
            info!(
                "{} negotiated {}x{} in place of the requested {}x{}; using the driver's geometry",
                device.display(),
                neg_w,
                neg_h,
                width,
                height
            );
        }

        let interval = linuxvideo::Fract::new(1, fps.max(1));
        if let Err(e) = capture.set_frame_interval(interval) {
            warn!(
                "{} would not honor the requested {fps} fps frame interval: {e}, continuing with the driver default",
                device.display()
            );
        }

        let slots = (0..V4L2_BUFFER_COUNT)
            .map(|_| Vec::with_capacity((neg_w as usize * neg_h as usize) / 2))
            .collect();

        Ok(Self {
            device_path: device.to_path_buf(),
            capture: Some(capture),
            state: State::Idle,
            width: neg_w,
            height: neg_h,
            slots,
            slot_busy: vec![false; V4L2_BUFFER_COUNT],
            next_slot: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Allocates the kernel buffer ring and enables streaming. Idempotent.
    pub fn start(&mut self) -> CameraResult<()> {
        if matches!(self.state, State::Capturing { .. }) {
            return Ok(());
        }

        let capture = self.capture.take().ok_or_else(|| {
            CameraError::DeviceOperationFailed("capture device already consumed".to_string())
        })?;

        let stream = capture.into_stream().map_err(|e| {
            CameraError::DeviceOperationFailed(format!(
                "failed to start streaming on {}: {e}",
                self.device_path.display()
            ))
        })?;
        let fd = stream.as_raw_fd();

        info!(
            "streaming started on {} ({}x{})",
            self.device_path.display(),
            self.width,
            self.height
        );
        self.state = State::Capturing { stream, fd };
        Ok(())
    }

    /// Waits on the device fd for up to `timeout`, then dequeues one frame
    /// into the next free local slot. EINTR is retried internally; a poll
    /// timeout or a DQBUF EAGAIN both surface as [`DequeueOutcome::Timeout`].
    pub fn dequeue(&mut self, timeout: Duration) -> CameraResult<DequeueOutcome> {
        let (stream, fd) = match &mut self.state {
            State::Capturing { stream, fd } => (stream, *fd),
            State::Idle => {
                return Err(CameraError::DeviceOperationFailed(
                    "dequeue called before start".to_string(),
                ))
            }
        };

        if !Self::wait_readable(fd, timeout)? {
            return Ok(DequeueOutcome::Timeout);
        }

        let slot = self.next_slot;
        self.next_slot = (self.next_slot + 1) % V4L2_BUFFER_COUNT;
        let buf = &mut self.slots[slot];
        buf.clear();

        let result = stream.dequeue(|view| {
            if view.is_error() {
                warn!("driver flagged a buffer error on this capture");
            }
            buf.extend_from_slice(&view);
            Ok(())
        });

        match result {
            Ok(()) => {
                self.slot_busy[slot] = true;
                Ok(DequeueOutcome::Frame {
                    buffer_index: slot,
                    bytes_used: self.slots[slot].len(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(DequeueOutcome::Timeout),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                // Treated as "nothing happened yet"; the worker's own loop
                // will call dequeue again on its next iteration.
                Ok(DequeueOutcome::Timeout)
            }
            Err(e) => Err(CameraError::V4L2Error(e.to_string())),
        }
    }

    /// Returns the valid bytes of the local slot filled by the matching
    /// [`dequeue`](Self::dequeue) call.
    pub fn buffer(&self, buffer_index: usize) -> &[u8] {
        &self.slots[buffer_index]
    }

    /// Returns a local slot to the free pool. The corresponding kernel
    /// buffer was already re-queued by `linuxvideo` when the `dequeue`
    /// closure returned; this call only governs reuse of our own copy.
    pub fn requeue(&mut self, buffer_index: usize) -> CameraResult<()> {
        if buffer_index >= self.slot_busy.len() {
            return Err(CameraError::DeviceOperationFailed(format!(
                "invalid buffer index {buffer_index}"
            )));
        }
        self.slot_busy[buffer_index] = false;
        Ok(())
    }

    /// Disables streaming, dropping back to the pre-`start` state.
    pub fn stop(&mut self) -> CameraResult<()> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Capturing { stream, .. } => {
                drop(stream);
                info!("streaming stopped on {}", self.device_path.display());
            }
            State::Idle => {}
        }
        Ok(())
    }

    fn wait_readable(fd: RawFd, timeout: Duration) -> CameraResult<bool> {
        let millis = timeout.as_millis().min(i32::MAX as u128) as i32;
        let poll_timeout = PollTimeout::try_from(millis).unwrap_or(PollTimeout::MAX);
        loop {
            let mut fds = [PollFd::new(
                unsafe { std::os::fd::BorrowedFd::borrow_raw(fd) },
                PollFlags::POLLIN,
            )];
            match poll(&mut fds, poll_timeout) {
                Ok(0) => return Ok(false),
                Ok(_) => return Ok(true),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(CameraError::V4L2Error(e.to_string())),
            }
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
