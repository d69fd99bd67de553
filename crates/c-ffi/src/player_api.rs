use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::path::PathBuf;

use display_pipeline::{Player, PlayerConfig};

use crate::state::{get_player, PLAYER_STATE};
use crate::types::{CDetectionBox, CPlayerStats, CStreamFormat, ErrorCode};

/// Wraps a raw user-data pointer so it can cross into the player's
/// callback closure, which the display pipeline requires to be
/// `Send + Sync`. Safety is the caller's: the pointer must stay valid for
/// as long as the frame callback is installed.
struct SendPtr(*mut c_void);
unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}

/// Builds the GStreamer display pipeline and parks it in `Created` state.
#[no_mangle]
#[allow(static_mut_refs)]
pub extern "C" fn player_create(
    device: *const c_char,
    width: u32,
    height: u32,
    fps: u32,
    face_detect_fps: u32,
    face_detect_width: u32,
    face_detect_height: u32,
    format: CStreamFormat,
    hardware_decode: bool,
    use_rga: bool,
) -> c_int {
    if device.is_null() {
        return ErrorCode::InvalidParam as c_int;
    }
    unsafe {
        if PLAYER_STATE.is_some() {
            tracing::warn!("player_create called while a player already exists");
            return ErrorCode::DeviceBusy as c_int;
        }
    }

    let device_str = match unsafe { std::ffi::CStr::from_ptr(device) }.to_str() {
        Ok(s) => s,
        Err(_) => return ErrorCode::InvalidParam as c_int,
    };

    let config = PlayerConfig {
        device: PathBuf::from(device_str),
        width,
        height,
        fps,
        face_detect_fps,
        face_detect_width,
        face_detect_height,
        format: format.into(),
        hardware_decode,
        use_rga,
    };

    match Player::create(config) {
        Ok(player) => {
            unsafe {
                PLAYER_STATE = Some(player);
            }
            ErrorCode::Ok as c_int
        }
        Err(e) => {
            tracing::error!("player_create failed: {e}");
            ErrorCode::from(&e) as c_int
        }
    }
}

/// Hands the render sink a native window handle. Must precede `player_start`.
#[no_mangle]
pub extern "C" fn player_set_window(handle: usize) -> c_int {
    let player = match get_player() {
        Some(p) => p,
        None => return ErrorCode::NoDisplay as c_int,
    };
    match player.set_window(handle) {
        Ok(()) => ErrorCode::Ok as c_int,
        Err(e) => ErrorCode::from(&e) as c_int,
    }
}

/// Installs the detection-branch frame callback. `user_data` is handed
/// back verbatim on every invocation.
#[no_mangle]
pub extern "C" fn player_set_frame_callback(
    callback: Option<extern "C" fn(*const u8, u32, u32, u32, *mut c_void)>,
    user_data: *mut c_void,
) -> c_int {
    let player = match get_player() {
        Some(p) => p,
        None => return ErrorCode::NoDisplay as c_int,
    };
    let Some(callback) = callback else {
        return ErrorCode::InvalidParam as c_int;
    };
    let boxed_user_data = SendPtr(user_data);
    player.set_frame_callback(Box::new(move |data, width, height, stride| {
        callback(data.as_ptr(), width, height, stride, boxed_user_data.0);
    }));
    ErrorCode::Ok as c_int
}

#[no_mangle]
pub extern "C" fn player_start() -> c_int {
    let player = match get_player() {
        Some(p) => p,
        None => return ErrorCode::NoDisplay as c_int,
    };
    match player.start() {
        Ok(()) => ErrorCode::Ok as c_int,
        Err(e) => ErrorCode::from(&e) as c_int,
    }
}

#[no_mangle]
pub extern "C" fn player_stop() -> c_int {
    let player = match get_player() {
        Some(p) => p,
        None => return ErrorCode::NoDisplay as c_int,
    };
    match player.stop() {
        Ok(()) => ErrorCode::Ok as c_int,
        Err(e) => ErrorCode::from(&e) as c_int,
    }
}

#[no_mangle]
pub extern "C" fn player_is_playing() -> bool {
    get_player().map(|p| p.is_playing()).unwrap_or(false)
}

/// Copies the pipeline's latest GStreamer error (if any) into `buf`,
/// truncated to `buf_len - 1` bytes and null-terminated. Returns the
/// untruncated length, or 0 if there is no error on record.
#[no_mangle]
pub extern "C" fn player_get_error_string(buf: *mut c_char, buf_len: usize) -> usize {
    let Some(player) = get_player() else { return 0 };
    let Some(message) = player.get_error_string() else { return 0 };
    if buf.is_null() || buf_len == 0 {
        return message.len();
    }
    let Ok(cstring) = CString::new(message.clone()) else { return 0 };
    let bytes = cstring.as_bytes_with_nul();
    let copy_len = bytes.len().min(buf_len);
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, copy_len);
        if copy_len == buf_len {
            *buf.add(buf_len - 1) = 0;
        }
    }
    message.len()
}

#[no_mangle]
pub extern "C" fn player_get_stats(stats_out: *mut CPlayerStats) -> c_int {
    if stats_out.is_null() {
        return ErrorCode::InvalidParam as c_int;
    }
    let Some(player) = get_player() else {
        return ErrorCode::NoDisplay as c_int;
    };
    unsafe {
        (*stats_out) = player.get_stats().into();
    }
    ErrorCode::Ok as c_int
}

/// Replaces the detection set the overlay probe draws from. `boxes` may be
/// null only if `count` is 0.
#[no_mangle]
pub extern "C" fn player_set_face_boxes(
    boxes: *const CDetectionBox,
    count: usize,
    source_width: u32,
    source_height: u32,
) -> c_int {
    let Some(player) = get_player() else {
        return ErrorCode::NoDisplay as c_int;
    };
    if boxes.is_null() && count > 0 {
        return ErrorCode::InvalidParam as c_int;
    }
    let slice = if count == 0 { &[][..] } else { unsafe { std::slice::from_raw_parts(boxes, count) } };
    let owned: Vec<display_pipeline::DetectionBox> = slice.iter().copied().map(Into::into).collect();
    player.set_face_boxes(&owned, source_width, source_height);
    ErrorCode::Ok as c_int
}

#[no_mangle]
pub extern "C" fn player_clear_face_boxes() -> c_int {
    let Some(player) = get_player() else {
        return ErrorCode::NoDisplay as c_int;
    };
    player.clear_face_boxes();
    ErrorCode::Ok as c_int
}

/// Stops the pipeline (if playing) and releases it.
#[no_mangle]
#[allow(static_mut_refs)]
pub extern "C" fn player_destroy() -> c_int {
    unsafe {
        if let Some(mut player) = PLAYER_STATE.take() {
            player.destroy();
        }
    }
    ErrorCode::Ok as c_int
}
