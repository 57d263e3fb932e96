//! Engine configuration, persisted as TOML in the user config directory.
//!
//! All timing windows and speed constants of the navigation engine live here.
//! Missing keys in the file fall back to the defaults below, so a config from
//! an older version keeps loading after new tunables are added.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No user config directory available")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Tunables for the navigation engine.
///
/// Speeds are in scroll units per frame, durations in milliseconds. The
/// defaults are calibrated for a ~60 Hz frame clock and a stock gamepad.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum absolute axis magnitude treated as intentional input.
    pub deadzone: f32,

    /// Scroll speed at the start of a hold.
    pub scroll_min_speed: f32,

    /// Scroll speed once the acceleration window has elapsed.
    pub scroll_max_speed: f32,

    /// Window over which scroll speed ramps from min to max.
    pub scroll_accel_ms: u64,

    /// Extra speed contributed by a fully pulled boost trigger.
    pub trigger_boost: f32,

    /// Delay before the first step repeat while a direction is held.
    pub nav_initial_delay_ms: u64,

    /// Repeat delay floor after full acceleration.
    pub nav_min_delay_ms: u64,

    /// Window over which the repeat delay shrinks to its floor.
    pub nav_accel_ms: u64,

    /// Second press of the primary button within this window toggles.
    pub double_press_ms: u64,

    /// Index into the frame's axis array driving scroll (left slot).
    pub left_stick_axis: usize,

    /// Index into the frame's axis array driving scroll (right slot).
    pub right_stick_axis: usize,

    /// Throttle for the raw-axis debug log line.
    pub axis_log_interval_ms: u64,

    /// External scroll notices are ignored this long after a
    /// controller-driven scroll; the step logic owns selection then.
    pub stick_reselect_block_ms: u64,

    /// Floor between two scroll-driven reselection passes.
    pub reselect_interval_ms: u64,

    /// Retry budget for the deferred unlike toggle.
    pub retry_attempts: u8,

    /// Spacing between unlike retries.
    pub retry_interval_ms: u64,

    /// Frame clock period of the runtime driver.
    pub frame_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.18,
            scroll_min_speed: 2.0,
            scroll_max_speed: 22.0,
            scroll_accel_ms: 500,
            trigger_boost: 8.0,
            nav_initial_delay_ms: 320,
            nav_min_delay_ms: 140,
            nav_accel_ms: 700,
            double_press_ms: 350,
            left_stick_axis: 1,
            right_stick_axis: 3,
            axis_log_interval_ms: 600,
            stick_reselect_block_ms: 400,
            reselect_interval_ms: 160,
            retry_attempts: 6,
            retry_interval_ms: 120,
            frame_interval_ms: 16,
        }
    }
}

impl EngineConfig {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("feedpad").join("config.toml"))
    }

    /// Writes a default config file if none exists yet.
    pub fn ensure_default_config() -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            debug!("Config file already present: {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(&Self::default())?;
        fs::write(&path, rendered)?;
        info!("Wrote default config to {}", path.display());
        Ok(())
    }

    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let raw = fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the persisted config, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }
}
