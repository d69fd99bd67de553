//! 流水线配置管理
//!
//! `PipelineConfig` is serialized/deserialized with serde+toml; a
//! background `notify` watcher keeps a shared `Arc<RwLock<PipelineConfig>>`
//! in sync with the file on disk for hot-reload.

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, RwLock};
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartScopeError};
use crate::logger::LogLevel;

/// Pixel format the capture side negotiates with the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Mjpeg,
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Mjpeg
    }
}

/// Full configuration for the capture/decode/display pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub device: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub format: PixelFormat,
    /// Not honored by the render branch of the display pipeline; see
    /// the design notes on this open question.
    pub use_hardware_decode: bool,
    pub use_rga: bool,
    pub face_detect_fps: u32,
    pub face_detect_width: u32,
    pub face_detect_height: u32,
    pub log_level: LogLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/video0"),
            width: 640,
            height: 480,
            fps: 30,
            format: PixelFormat::Mjpeg,
            use_hardware_decode: true,
            use_rga: true,
            face_detect_fps: 10,
            face_detect_width: 320,
            face_detect_height: 240,
            log_level: LogLevel::Info,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SmartScopeError::Config(format!("序列化配置失败: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Watches `path` on a dedicated background thread, reloading
/// `PipelineConfig` and writing it through the shared lock whenever the
/// file changes. The watcher (and its thread) is torn down when the
/// returned guard is dropped.
pub struct ConfigWatcher {
    _watcher: notify::RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn watch(path: &Path, shared: Arc<RwLock<PipelineConfig>>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)
            .map_err(|e| SmartScopeError::Config(format!("无法创建配置监视器: {}", e)))?;
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| SmartScopeError::Config(format!("无法监视配置文件: {}", e)))?;

        let watched_path = path.to_path_buf();
        std::thread::spawn(move || {
            while let Ok(event) = rx.recv_timeout(Duration::from_secs(3600)) {
                let Ok(event) = event else { continue };
                if !event.kind.is_modify() {
                    continue;
                }
                match PipelineConfig::load_from_file(&watched_path) {
                    Ok(new_config) => {
                        if let Ok(mut guard) = shared.write() {
                            tracing::info!("config hot-reloaded from {}", watched_path.display());
                            *guard = new_config;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("config hot-reload failed, keeping previous config: {e}");
                    }
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = PipelineConfig::default();
        config.save_to_file(&path).unwrap();
        let loaded = PipelineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.width, config.width);
        assert_eq!(loaded.device, config.device);
    }

    #[test]
    fn hot_reload_applies_a_changed_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let mut config = PipelineConfig::default();
        config.save_to_file(&path).unwrap();

        let shared = Arc::new(RwLock::new(config.clone()));
        let _watcher = ConfigWatcher::watch(&path, shared.clone()).unwrap();

        config.log_level = LogLevel::Debug;
        config.save_to_file(&path).unwrap();

        let mut seen_update = false;
        for _ in 0..50 {
            std::thread::sleep(Duration::from_millis(20));
            if shared.read().unwrap().log_level == LogLevel::Debug {
                seen_update = true;
                break;
            }
        }
        assert!(seen_update, "hot-reload did not observe the config change");
    }
}
