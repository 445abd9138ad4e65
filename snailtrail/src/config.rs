//! Configuration for the snail trail.
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [trail]
//! length = long
//! drift = true
//! capacity = 1000
//! shrink = 5
//! merge_distance = 4
//! display_scale = 1
//! max_overlay_points = 5000
//! sample_interval = 1.0
//! far_margin = 0.5
//! ```
//!
//! Missing keys keep their defaults.

use std::path::Path;
use std::str::FromStr;

use ini::Ini;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{DEFAULT_MAX_OVERLAY_POINTS, DEFAULT_MERGE_DISTANCE, DEFAULT_TRAIL_SHRINK};
use crate::trail::{DEFAULT_SAMPLE_INTERVAL_SECS, DEFAULT_TRAIL_CAPACITY};

/// INI section holding trail settings.
pub const TRAIL_SECTION: &str = "trail";

/// Errors that can occur while loading trail configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or parsing the INI file failed.
    #[error("Failed to read config: {0}")]
    Ini(#[from] ini::Error),

    /// Parsing INI text failed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ini::ParseError),

    /// A key holds a value that cannot be used.
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// How much trail history to draw.
///
/// `Full` draws the long trail and also overlays the contest path older
/// than the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailLength {
    /// Trail disabled.
    Off,
    /// Whole buffer.
    #[default]
    Long,
    /// Buffer divided by the shrink factor.
    Short,
    /// Whole buffer plus contest overlay.
    Full,
}

impl TrailLength {
    pub fn is_active(&self) -> bool {
        !matches!(self, TrailLength::Off)
    }
}

impl std::fmt::Display for TrailLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrailLength::Off => write!(f, "off"),
            TrailLength::Long => write!(f, "long"),
            TrailLength::Short => write!(f, "short"),
            TrailLength::Full => write!(f, "full"),
        }
    }
}

impl FromStr for TrailLength {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "off" => Self::Off,
            "short" => Self::Short,
            "full" => Self::Full,
            _ => Self::Long,
        })
    }
}

/// Trail recording and rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Trail detail mode.
    pub length: TrailLength,

    /// Apply wind drift to the trail while circling.
    pub drift_enabled: bool,

    /// Ring buffer size (samples).
    pub capacity: usize,

    /// Divisor applied for the short trail and again while circling.
    pub shrink: usize,

    /// Manhattan distance (unscaled pixels) below which points are merged.
    pub merge_distance: i32,

    /// Display scale multiplier applied to pixel constants.
    pub display_scale: i32,

    /// Maximum contest overlay polyline length.
    pub max_overlay_points: usize,

    /// Minimum spacing between recorded samples (seconds).
    pub sample_interval_secs: f64,

    /// Far-visibility margin as a fraction of the screen bounds.
    pub far_margin: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: TrailLength::Long,
            drift_enabled: true,
            capacity: DEFAULT_TRAIL_CAPACITY,
            shrink: DEFAULT_TRAIL_SHRINK,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            display_scale: 1,
            max_overlay_points: DEFAULT_MAX_OVERLAY_POINTS,
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            far_margin: 0.5,
        }
    }
}

impl TrailConfig {
    /// Load from an INI file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref())?;
        let config = Self::from_ini(&ini)?;
        tracing::info!(
            path = %path.as_ref().display(),
            length = %config.length,
            capacity = config.capacity,
            "Loaded trail configuration"
        );
        Ok(config)
    }

    /// Parse INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        Self::from_ini(&ini)
    }

    /// Read the `[trail]` section, keeping defaults for missing keys.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(section) = ini.section(Some(TRAIL_SECTION)) else {
            return Ok(config);
        };

        if let Some(v) = section.get("length") {
            config.length = v.parse().unwrap_or_default();
        }
        if let Some(v) = section.get("drift") {
            config.drift_enabled = parse_bool("drift", v)?;
        }
        if let Some(v) = section.get("capacity") {
            config.capacity = parse_number("capacity", v)?;
        }
        if let Some(v) = section.get("shrink") {
            config.shrink = parse_number("shrink", v)?;
        }
        if let Some(v) = section.get("merge_distance") {
            config.merge_distance = parse_number("merge_distance", v)?;
        }
        if let Some(v) = section.get("display_scale") {
            config.display_scale = parse_number("display_scale", v)?;
        }
        if let Some(v) = section.get("max_overlay_points") {
            config.max_overlay_points = parse_number("max_overlay_points", v)?;
        }
        if let Some(v) = section.get("sample_interval") {
            config.sample_interval_secs = parse_number("sample_interval", v)?;
        }
        if let Some(v) = section.get("far_margin") {
            config.far_margin = parse_number("far_margin", v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(invalid("capacity", self.capacity, "must be at least 1"));
        }
        if self.shrink == 0 {
            return Err(invalid("shrink", self.shrink, "must be at least 1"));
        }
        if self.display_scale < 1 {
            return Err(invalid("display_scale", self.display_scale, "must be at least 1"));
        }
        if self.merge_distance < 0 {
            return Err(invalid("merge_distance", self.merge_distance, "must not be negative"));
        }
        if !self.sample_interval_secs.is_finite() || self.sample_interval_secs < 0.0 {
            return Err(invalid(
                "sample_interval",
                self.sample_interval_secs,
                "must be a non-negative number of seconds",
            ));
        }
        if !self.far_margin.is_finite() || self.far_margin < 0.0 {
            return Err(invalid("far_margin", self.far_margin, "must not be negative"));
        }
        Ok(())
    }

    /// Merge threshold in screen pixels.
    pub fn scaled_merge_distance(&self) -> i32 {
        self.merge_distance * self.display_scale
    }
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "not a number"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}
