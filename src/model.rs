use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
}

impl Track {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = title_from_path(&path);
        Self { path, title }
    }
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShuffleAlgorithm {
    /// Swap every slot with a random slot drawn from all but the last one.
    #[default]
    Legacy,
    FisherYates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_true")]
    pub random_order_on_start: bool,
    #[serde(default = "default_true")]
    pub loop_at_end: bool,
    #[serde(default)]
    pub shuffle_algorithm: ShuffleAlgorithm,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            random_order_on_start: true,
            loop_at_end: true,
            shuffle_algorithm: ShuffleAlgorithm::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub output_device: Option<String>,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_null_fallback_seconds")]
    pub null_fallback_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    1.0
}

fn default_frame_interval_ms() -> u64 {
    33
}

fn default_null_fallback_seconds() -> u64 {
    180
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            output_device: None,
            volume: default_volume(),
            frame_interval_ms: default_frame_interval_ms(),
            null_fallback_seconds: default_null_fallback_seconds(),
        }
    }
}
