use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use capture_core::log_from_cpp;

use crate::types::{CLogLevel, ErrorCode};

/// Log function for native callers on the other side of the boundary.
#[no_mangle]
pub extern "C" fn camera_log(level: CLogLevel, module: *const c_char, message: *const c_char) -> c_int {
    if module.is_null() || message.is_null() {
        return ErrorCode::InvalidParam as c_int;
    }

    let module_str = match unsafe { CStr::from_ptr(module) }.to_str() {
        Ok(s) => s,
        Err(_) => return ErrorCode::InvalidParam as c_int,
    };
    let message_str = match unsafe { CStr::from_ptr(message) }.to_str() {
        Ok(s) => s,
        Err(_) => return ErrorCode::InvalidParam as c_int,
    };

    log_from_cpp(level.into(), module_str, message_str);
    ErrorCode::Ok as c_int
}
