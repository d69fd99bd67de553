use crate::bindings::*;
use crate::error::{MppError, MppResult};
use std::ptr;

/// A decoded YUV frame, backed by a DMA buffer owned by the decoder's buffer group.
#[derive(Debug)]
pub struct MppFrame {
    frame: crate::bindings::MppFrame,
}

impl MppFrame {
    pub fn from_ptr(frame: crate::bindings::MppFrame) -> Self {
        MppFrame { frame }
    }

    pub fn as_ptr(&self) -> crate::bindings::MppFrame {
        self.frame
    }

    pub fn new() -> MppResult<Self> {
        let mut frame = ptr::null_mut();
        unsafe {
            let ret = mpp_frame_init(&mut frame);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
        }
        Ok(MppFrame { frame })
    }

    pub fn width(&self) -> u32 {
        unsafe { mpp_frame_get_width(self.frame) }
    }

    pub fn height(&self) -> u32 {
        unsafe { mpp_frame_get_height(self.frame) }
    }

    pub fn hor_stride(&self) -> u32 {
        unsafe { mpp_frame_get_hor_stride(self.frame) }
    }

    pub fn ver_stride(&self) -> u32 {
        unsafe { mpp_frame_get_ver_stride(self.frame) }
    }

    /// Non-zero when the hardware reported a decode error for this frame.
    pub fn error_info(&self) -> u32 {
        unsafe { mpp_frame_get_errinfo(self.frame) }
    }

    /// Pixel format the hardware actually decoded into, masked down to the
    /// FMT bits with `MPP_FRAME_FMT_MASK` — the raw value also carries
    /// HDR/FBC flag bits the color converter doesn't care about — and
    /// mapped onto the semiplanar layouts the capture pipeline supports.
    pub fn format(&self) -> PixelFormat {
        let raw = unsafe { mpp_frame_get_fmt(self.frame) & MPP_FRAME_FMT_MASK };
        match raw {
            MPP_FMT_YUV420SP => PixelFormat::Nv12,
            MPP_FMT_YUV420SP_VU => PixelFormat::Nv21,
            MPP_FMT_YUV422SP => PixelFormat::Nv16,
            MPP_FMT_YUV422SP_VU => PixelFormat::Nv61,
            other => PixelFormat::Other(other),
        }
    }

    pub fn set_buffer(&mut self, buffer: &crate::buffer::MppBuffer) -> MppResult<()> {
        unsafe {
            let ret = mpp_frame_set_buffer(self.frame, buffer.as_ptr());
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
        }
        Ok(())
    }

    pub fn buffer(&self) -> Option<crate::bindings::MppBuffer> {
        let buf = unsafe { mpp_frame_get_buffer(self.frame) };
        if buf.is_null() {
            None
        } else {
            Some(buf)
        }
    }

    /// DMA file descriptor of the frame's backing buffer, suitable for
    /// zero-copy import into the 2D accelerator.
    pub fn fd(&self) -> MppResult<i32> {
        let buf = self
            .buffer()
            .ok_or_else(|| MppError::Unknown("frame has no backing buffer".to_string()))?;
        let caller = std::ffi::CString::new("rust_frame").unwrap();
        let fd = unsafe { mpp_buffer_get_fd_with_caller(buf, caller.as_ptr()) };
        if fd < 0 {
            return Err(MppError::MppError(fd));
        }
        Ok(fd)
    }

    /// Raw YUV bytes of the frame's backing buffer, for the CPU fallback
    /// color converter.
    pub fn data(&self) -> &[u8] {
        let buf = match self.buffer() {
            Some(b) => b,
            None => return &[],
        };
        let caller = std::ffi::CString::new("rust_frame").unwrap();
        unsafe {
            let ptr = mpp_buffer_get_ptr_with_caller(buf, caller.as_ptr());
            let size = mpp_buffer_get_size_with_caller(buf, caller.as_ptr());
            if ptr.is_null() || size == 0 {
                return &[];
            }
            std::slice::from_raw_parts(ptr as *const u8, size)
        }
    }
}

/// The semiplanar YUV layouts the decode path recognizes, mirroring
/// `MPP_FRAME_FMT_MASK`'s `MPP_FMT_YUV420SP*`/`MPP_FMT_YUV422SP*` cases in
/// `v4l2_mpp_camera.c`'s `yuv_to_bgra_rga`/`yuv_to_bgra_cpu`. Any other
/// masked value (packed YUV, RGB, FBC-compressed, …) is carried through as
/// `Other` so callers can fail loudly instead of silently misreading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Nv12,
    Nv21,
    Nv16,
    Nv61,
    Other(MppFrameFormat),
}

impl Drop for MppFrame {
    fn drop(&mut self) {
        unsafe {
            let _ = mpp_frame_deinit(&mut self.frame);
        }
    }
}
