use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use capture_core::{CaptureWorker, ConfigWatcher, FrameExchange, PipelineConfig};
use display_pipeline::Player;

/// Sealed global camera context: the frame exchange, the capture worker,
/// and the live config it reads from, wired up once by `camera_init` and
/// torn down by `camera_deinit`.
pub(crate) struct CameraContext {
    pub config: Arc<RwLock<PipelineConfig>>,
    pub exchange: Arc<FrameExchange>,
    pub worker: CaptureWorker,
    pub watcher: Option<ConfigWatcher>,
}

pub(crate) static mut CAMERA_STATE: Option<CameraContext> = None;
pub(crate) static mut PLAYER_STATE: Option<Player> = None;
pub(crate) static GLOBAL_INIT_DONE: AtomicBool = AtomicBool::new(false);

#[allow(static_mut_refs)]
pub(crate) fn get_camera_context() -> Option<&'static mut CameraContext> {
    unsafe { CAMERA_STATE.as_mut() }
}

#[allow(static_mut_refs)]
pub(crate) fn get_player() -> Option<&'static mut Player> {
    unsafe { PLAYER_STATE.as_mut() }
}

pub(crate) fn is_globally_initialized() -> bool {
    GLOBAL_INIT_DONE.load(Ordering::Acquire)
}
