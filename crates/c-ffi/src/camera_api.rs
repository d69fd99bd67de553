use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::sync::{Arc, Mutex, RwLock};

use capture_core::{CaptureWorker, FrameExchange, PipelineConfig, SmartScopeError};

use crate::state::{get_camera_context, CameraContext, CAMERA_STATE};
use crate::types::{CFrame, ErrorCode};

lazy_static::lazy_static! {
    static ref FRAME_BUFFER: Mutex<Vec<u8>> = Mutex::new(Vec::new());
}

/// Builds the camera context from a TOML config file (or the built-in
/// default if `config_path` is null) and parks it ready for `camera_start`.
#[no_mangle]
#[allow(static_mut_refs)]
pub extern "C" fn camera_init(config_path: *const c_char) -> c_int {
    unsafe {
        if CAMERA_STATE.is_some() {
            tracing::warn!("camera_init called while already initialized");
            return ErrorCode::DeviceBusy as c_int;
        }
    }

    let config = if config_path.is_null() {
        PipelineConfig::default()
    } else {
        let path_str = match unsafe { CStr::from_ptr(config_path) }.to_str() {
            Ok(s) => s,
            Err(_) => return ErrorCode::InvalidParam as c_int,
        };
        match PipelineConfig::load_from_file(path_str) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to load config from {path_str}: {e}");
                return ErrorCode::InvalidParam as c_int;
            }
        }
    };

    let context = CameraContext {
        config: Arc::new(RwLock::new(config)),
        exchange: Arc::new(FrameExchange::new()),
        worker: CaptureWorker::new(),
        watcher: None,
    };

    unsafe {
        CAMERA_STATE = Some(context);
    }
    ErrorCode::Ok as c_int
}

/// Spawns the capture worker thread. Idempotent while already running.
#[no_mangle]
pub extern "C" fn camera_start() -> c_int {
    let context = match get_camera_context() {
        Some(c) => c,
        None => return ErrorCode::NotRunning as c_int,
    };

    if context.worker.is_running() {
        return ErrorCode::Ok as c_int;
    }

    let (device, width, height, fps) = {
        let config = context.config.read().unwrap();
        (config.device.clone(), config.width, config.height, config.fps)
    };

    match context.worker.start(device, width, height, fps, Arc::clone(&context.exchange), None) {
        Ok(()) => ErrorCode::Ok as c_int,
        Err(e) => {
            tracing::error!("camera_start failed: {e}");
            ErrorCode::from(&e) as c_int
        }
    }
}

/// Signals the capture worker to stop and joins it. Idempotent.
#[no_mangle]
pub extern "C" fn camera_stop() -> c_int {
    let context = match get_camera_context() {
        Some(c) => c,
        None => return ErrorCode::NotRunning as c_int,
    };

    match context.worker.stop() {
        Ok(()) => ErrorCode::Ok as c_int,
        Err(e) => {
            tracing::error!("camera_stop failed: {e}");
            ErrorCode::from(&e) as c_int
        }
    }
}

#[no_mangle]
pub extern "C" fn camera_is_running() -> bool {
    get_camera_context().map(|c| c.worker.is_running()).unwrap_or(false)
}

/// Copies the most recently published BGRA frame into a process-wide
/// stable buffer and fills `frame_out` with pointers into it — the same
/// static-buffer-behind-the-FFI-boundary pattern the teacher's camera API
/// uses for its own frame getters.
#[no_mangle]
pub extern "C" fn camera_capture_frame(frame_out: *mut CFrame) -> c_int {
    if frame_out.is_null() {
        return ErrorCode::InvalidParam as c_int;
    }

    let context = match get_camera_context() {
        Some(c) => c,
        None => return ErrorCode::NotRunning as c_int,
    };

    let Some((data, width, height)) = context.exchange.read() else {
        return ErrorCode::NotRunning as c_int;
    };

    let mut buffer = FRAME_BUFFER.lock().unwrap();
    *buffer = data;

    unsafe {
        (*frame_out) = CFrame {
            data: buffer.as_ptr(),
            data_len: buffer.len(),
            width,
            height,
        };
    }
    ErrorCode::Ok as c_int
}

/// Stops the worker (if running) and releases the camera context.
#[no_mangle]
#[allow(static_mut_refs)]
pub extern "C" fn camera_deinit() -> c_int {
    unsafe {
        if let Some(mut context) = CAMERA_STATE.take() {
            let _: Result<(), SmartScopeError> = context.worker.stop();
        }
    }
    ErrorCode::Ok as c_int
}
