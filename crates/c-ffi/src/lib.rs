//! C FFI boundary for the camera capture/decode/display pipeline.
//!
//! Exposes the `camera_*` capture lifecycle, the `player_*` display
//! lifecycle, and the shared error taxonomy as a flat `extern "C"` API,
//! matching the teacher's `smartscope-c-ffi` shape (`#[repr(C)]` structs,
//! `#[no_mangle]`, sealed global state behind a `Once`-guarded init).

use std::os::raw::c_int;

mod camera_api;
mod init;
mod logging_api;
mod player_api;
mod state;
mod types;

pub use camera_api::*;
pub use init::*;
pub use logging_api::*;
pub use player_api::*;
pub use types::{CDetectionBox, CFrame, CLogLevel, CPlayerStats, CStreamFormat, ErrorCode};

/// A static, non-owned string describing `error_code`. Never needs
/// freeing.
#[no_mangle]
pub extern "C" fn camera_get_error_string(error_code: c_int) -> *const std::os::raw::c_char {
    let code = decode_error_code(error_code);
    types::error_string(code).as_ptr() as *const std::os::raw::c_char
}

fn decode_error_code(value: c_int) -> ErrorCode {
    match value {
        x if x == ErrorCode::Ok as c_int => ErrorCode::Ok,
        x if x == ErrorCode::InitFailed as c_int => ErrorCode::InitFailed,
        x if x == ErrorCode::InvalidParam as c_int => ErrorCode::InvalidParam,
        x if x == ErrorCode::DeviceNotFound as c_int => ErrorCode::DeviceNotFound,
        x if x == ErrorCode::DeviceBusy as c_int => ErrorCode::DeviceBusy,
        x if x == ErrorCode::NotSupported as c_int => ErrorCode::NotSupported,
        x if x == ErrorCode::PipelineFailed as c_int => ErrorCode::PipelineFailed,
        x if x == ErrorCode::MppInitFailed as c_int => ErrorCode::MppInitFailed,
        x if x == ErrorCode::V4l2InitFailed as c_int => ErrorCode::V4l2InitFailed,
        x if x == ErrorCode::OutOfMemory as c_int => ErrorCode::OutOfMemory,
        x if x == ErrorCode::DecodeFailed as c_int => ErrorCode::DecodeFailed,
        x if x == ErrorCode::NotRunning as c_int => ErrorCode::NotRunning,
        x if x == ErrorCode::NoDisplay as c_int => ErrorCode::NoDisplay,
        x if x == ErrorCode::WindowInvalid as c_int => ErrorCode::WindowInvalid,
        _ => ErrorCode::Error,
    }
}

/// Returns whether `camera_global_init` has run.
#[no_mangle]
pub extern "C" fn camera_is_globally_initialized() -> bool {
    state::is_globally_initialized()
}
