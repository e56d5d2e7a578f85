use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub timeline: TimelineConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

/// Tunables for the drag/momentum behaviour of the timeline.
/// Tuned by feel; none of them is a hard contract.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimelineConfig {
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
    #[serde(default = "default_quick_release_ms")]
    pub quick_release_ms: f64,
    #[serde(default = "default_min_release_velocity")]
    pub min_release_velocity: f64,
    #[serde(default = "default_decay")]
    pub decay: f64,
    #[serde(default = "default_stop_velocity")]
    pub stop_velocity: f64,
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    #[serde(default = "default_frame_time_scale")]
    pub frame_time_scale: f64,
    #[serde(default = "default_click_threshold_px")]
    pub click_threshold_px: f64,
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            velocity_scale: default_velocity_scale(),
            quick_release_ms: default_quick_release_ms(),
            min_release_velocity: default_min_release_velocity(),
            decay: default_decay(),
            stop_velocity: default_stop_velocity(),
            max_frames: default_max_frames(),
            frame_time_scale: default_frame_time_scale(),
            click_threshold_px: default_click_threshold_px(),
            wheel_multiplier: default_wheel_multiplier(),
        }
    }
}

fn default_base_url() -> String {
    "https://rickandmortyapi.com/api".to_string()
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_suggestion_limit() -> usize {
    5
}
fn default_velocity_scale() -> f64 {
    0.3
}
fn default_quick_release_ms() -> f64 {
    100.0
}
fn default_min_release_velocity() -> f64 {
    1.0
}
fn default_decay() -> f64 {
    0.95
}
fn default_stop_velocity() -> f64 {
    0.1
}
fn default_max_frames() -> u32 {
    60
}
fn default_frame_time_scale() -> f64 {
    0.2
}
fn default_click_threshold_px() -> f64 {
    5.0
}
fn default_wheel_multiplier() -> f64 {
    2.0
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).context("Failed to parse config.yml")
    }

    /// Loads `config.yml` from the working directory, falling back to
    /// defaults when the file does not exist.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let config = Config::load_from(&temp_dir.path().join("config.yml"))?;

        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "https://rickandmortyapi.com/api");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.timeline.max_frames, 60);
        Ok(())
    }

    #[test]
    fn test_partial_file_merges_with_defaults() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.yml");
        std::fs::write(
            &path,
            "api:\n  base_url: http://localhost:8080/api\ntimeline:\n  decay: 0.9\n",
        )?;

        let config = Config::load_from(&path)?;

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeline.decay, 0.9);
        assert_eq!(config.timeline.velocity_scale, 0.3);
        assert_eq!(config.search.suggestion_limit, 5);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let result = Config::from_yaml("search: [not, a, map]");
        assert!(result.is_err());
    }
}
