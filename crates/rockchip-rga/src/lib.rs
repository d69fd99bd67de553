//! Rust bindings over Rockchip's RGA 2D accelerator, plus a CPU fallback
//! for the YUV-semiplanar-to-BGRA conversion the capture pipeline needs.

#[allow(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    dead_code,
    clippy::all
)]
pub(crate) mod bindings {
    include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
}

pub use bindings::*;

mod buffer;
mod convert;
pub mod cpu_fallback;
mod error;

pub use buffer::{RgaBuffer, RgaFormat, RgaRect, YuvSemiplanarFormat};
pub use convert::convert_yuv_to_bgra_hw;
pub use error::{RgaError, RgaResult};

/// Converts one semiplanar YUV frame to packed BGRA, preferring the RGA
/// hardware blit and transparently falling back to the CPU path on any
/// hardware failure — the contract in §4.C of the color converter.
pub fn convert_yuv_to_bgra(
    yuv_fd: i32,
    y_plane: &[u8],
    chroma_plane: &[u8],
    format: YuvSemiplanarFormat,
    width: u32,
    height: u32,
    hor_stride: u32,
    ver_stride: u32,
    dst_bgra: &mut [u8],
    dst_stride: u32,
) {
    let hw_result = convert_yuv_to_bgra_hw(
        yuv_fd, format, width, height, hor_stride, ver_stride, dst_bgra, dst_stride,
    );

    if let Err(err) = hw_result {
        log::warn!("RGA hardware color conversion failed ({err}), falling back to CPU");
        cpu_fallback::convert_yuv_to_bgra_cpu(
            y_plane,
            chroma_plane,
            width,
            height,
            hor_stride,
            hor_stride,
            format,
            dst_bgra,
            dst_stride,
        );
    }
}
