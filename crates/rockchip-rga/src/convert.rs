//! Hardware-accelerated YUV-semiplanar to packed-BGRA color conversion, with
//! the RGA 2D accelerator as the preferred path and a CPU fallback.

use crate::bindings::*;
use crate::buffer::YuvSemiplanarFormat;
use crate::error::{RgaError, RgaResult};
use std::os::raw::c_void;

/// Imports a DMA YUV frame (by file descriptor) and a BGRA destination (by
/// virtual address) as RGA buffer handles and runs a single blit between
/// them. Both import handles are released on every exit path. On any
/// failure the caller is expected to fall back to [`crate::cpu_fallback`].
pub fn convert_yuv_to_bgra_hw(
    yuv_fd: i32,
    yuv_format: YuvSemiplanarFormat,
    width: u32,
    height: u32,
    hor_stride: u32,
    ver_stride: u32,
    dst_bgra: &mut [u8],
    dst_stride: u32,
) -> RgaResult<()> {
    if (dst_stride as usize) * (height as usize) > dst_bgra.len() {
        return Err(RgaError::InvalidParameter(
            "destination buffer smaller than stride*height".to_string(),
        ));
    }

    let src_handle = unsafe { importbuffer_fd(yuv_fd, width as i32, height as i32, yuv_format.to_rga_format() as i32) };
    if src_handle == 0 {
        return Err(RgaError::RgaError(-1));
    }

    // Ensure the source handle is released even if the destination import
    // or the blit itself fails.
    let result = (|| -> RgaResult<()> {
        let dst_handle = unsafe {
            importbuffer_virtualaddr(
                dst_bgra.as_mut_ptr() as *mut c_void,
                width as i32,
                height as i32,
                crate::buffer::RGA_FORMAT_BGRA_8888,
            )
        };
        if dst_handle == 0 {
            return Err(RgaError::RgaError(-1));
        }

        let blit_result = (|| -> RgaResult<()> {
            let src = unsafe {
                wrapbuffer_handle_t(
                    src_handle,
                    width as i32,
                    height as i32,
                    hor_stride as i32,
                    ver_stride as i32,
                    yuv_format.to_rga_format() as i32,
                )
            };
            let dst = unsafe {
                wrapbuffer_handle_t(
                    dst_handle,
                    width as i32,
                    height as i32,
                    (dst_stride / 4) as i32,
                    height as i32,
                    crate::buffer::RGA_FORMAT_BGRA_8888,
                )
            };

            let status = unsafe {
                improcess(
                    src,
                    dst,
                    std::mem::zeroed(),
                    std::mem::zeroed(),
                    std::mem::zeroed(),
                    std::mem::zeroed(),
                    0,
                )
            };
            if status != IM_STATUS_IM_STATUS_SUCCESS {
                return Err(RgaError::RgaError(status));
            }
            Ok(())
        })();

        unsafe {
            releasebuffer_handle(dst_handle);
        }
        blit_result
    })();

    unsafe {
        releasebuffer_handle(src_handle);
    }

    result
}
