//! # Grid Configuration
//!
//! Display range and input limits for the annotation view, read once at startup.
//!
//! ## YAML Format
//! All keys are optional; missing keys take the defaults shown here.
//! ```yaml
//! note-range: { min: 0, max: 119 }
//! bpm-range: { min: 1, max: 512 }
//! beats-per-bar-range: { min: 1, max: 16 }
//! px-per-second: 50
//! zoom: { x: 2, y: 5 }
//! ```
//!
//! `px-per-second` is the horizontal resolution of the spectrogram image and `zoom`
//! is the on-screen magnification applied on top of it.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

pub const DEFAULT_NOTE_RANGE: InclusiveRange<i32> = InclusiveRange { min: 0, max: 119 };
pub const DEFAULT_BPM_RANGE: InclusiveRange<u32> = InclusiveRange { min: 1, max: 512 };
pub const DEFAULT_BEATS_PER_BAR_RANGE: InclusiveRange<u32> = InclusiveRange { min: 1, max: 16 };
pub const DEFAULT_PX_PER_SECOND: f64 = 50.0;
pub const DEFAULT_ZOOM: Zoom = Zoom { x: 2.0, y: 5.0 };

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Pull `value` into the range.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// On-screen magnification of the spectrogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub x: f64,
    pub y: f64,
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub note_range: Option<InclusiveRange<i32>>,
    pub bpm_range: Option<InclusiveRange<u32>>,
    pub beats_per_bar_range: Option<InclusiveRange<u32>>,
    pub px_per_second: Option<f64>,
    pub zoom: Option<Zoom>,
}

/// Validated grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GridConfig {
    pub note_range: InclusiveRange<i32>,
    pub bpm_range: InclusiveRange<u32>,
    pub beats_per_bar_range: InclusiveRange<u32>,
    pub px_per_second: f64,
    pub zoom: Zoom,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            note_range: DEFAULT_NOTE_RANGE,
            bpm_range: DEFAULT_BPM_RANGE,
            beats_per_bar_range: DEFAULT_BEATS_PER_BAR_RANGE,
            px_per_second: DEFAULT_PX_PER_SECOND,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl GridConfig {
    /// Parse and validate a YAML configuration document.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, GridError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| GridError::ConfigError(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, GridError> {
        let config = Self {
            note_range: raw.note_range.unwrap_or(DEFAULT_NOTE_RANGE),
            bpm_range: raw.bpm_range.unwrap_or(DEFAULT_BPM_RANGE),
            beats_per_bar_range: raw.beats_per_bar_range.unwrap_or(DEFAULT_BEATS_PER_BAR_RANGE),
            px_per_second: raw.px_per_second.unwrap_or(DEFAULT_PX_PER_SECOND),
            zoom: raw.zoom.unwrap_or(DEFAULT_ZOOM),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the grid cannot work with.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.note_range.min >= self.note_range.max {
            return Err(GridError::ConfigError(format!(
                "note-range min ({}) must be below max ({})",
                self.note_range.min, self.note_range.max
            )));
        }
        check_count_range("bpm-range", &self.bpm_range)?;
        check_count_range("beats-per-bar-range", &self.beats_per_bar_range)?;
        if !self.px_per_second.is_finite() || self.px_per_second <= 0.0 {
            return Err(GridError::ConfigError(format!(
                "px-per-second must be positive, got {}",
                self.px_per_second
            )));
        }
        if !(self.zoom.x.is_finite() && self.zoom.x > 0.0 && self.zoom.y.is_finite() && self.zoom.y > 0.0)
        {
            return Err(GridError::ConfigError(format!(
                "zoom factors must be positive, got x={} y={}",
                self.zoom.x, self.zoom.y
            )));
        }
        Ok(())
    }
}

fn check_count_range(name: &str, range: &InclusiveRange<u32>) -> Result<(), GridError> {
    if range.min == 0 {
        return Err(GridError::ConfigError(format!("{} min must be at least 1", name)));
    }
    if range.min > range.max {
        return Err(GridError::ConfigError(format!(
            "{} min ({}) must not exceed max ({})",
            name, range.min, range.max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        assert_eq!(GridConfig::from_yaml("").unwrap(), GridConfig::default());
        assert_eq!(GridConfig::from_yaml("  \n").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = GridConfig::from_yaml(
            r#"
note-range: { min: 21, max: 108 }
bpm-range:
  min: 40
  max: 240
"#,
        )
        .unwrap();
        assert_eq!(config.note_range, InclusiveRange { min: 21, max: 108 });
        assert_eq!(config.bpm_range, InclusiveRange { min: 40, max: 240 });
        assert_eq!(config.beats_per_bar_range, DEFAULT_BEATS_PER_BAR_RANGE);
        assert_eq!(config.px_per_second, DEFAULT_PX_PER_SECOND);
        assert_eq!(config.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_full_yaml() {
        let config = GridConfig::from_yaml(
            r#"
note-range: { min: 12, max: 96 }
bpm-range: { min: 30, max: 300 }
beats-per-bar-range: { min: 2, max: 12 }
px-per-second: 64
zoom: { x: 1.5, y: 4 }
"#,
        )
        .unwrap();
        assert_eq!(config.beats_per_bar_range, InclusiveRange { min: 2, max: 12 });
        assert_eq!(config.px_per_second, 64.0);
        assert_eq!(config.zoom, Zoom { x: 1.5, y: 4.0 });
    }

    #[test]
    fn test_degenerate_note_range() {
        let err = GridConfig::from_yaml("note-range: { min: 60, max: 60 }").unwrap_err();
        assert!(matches!(err, GridError::ConfigError(_)));
        assert!(err.to_string().contains("note-range"));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            GridConfig::from_yaml("bpm-range: { min: 0, max: 100 }"),
            Err(GridError::ConfigError(_))
        ));
        assert!(matches!(
            GridConfig::from_yaml("beats-per-bar-range: { min: 8, max: 4 }"),
            Err(GridError::ConfigError(_))
        ));
        assert!(matches!(
            GridConfig::from_yaml("px-per-second: -3"),
            Err(GridError::ConfigError(_))
        ));
        assert!(matches!(
            GridConfig::from_yaml("zoom: { x: 0, y: 5 }"),
            Err(GridError::ConfigError(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            GridConfig::from_yaml("note-range: [oops"),
            Err(GridError::ConfigError(_))
        ));
        assert!(matches!(
            GridConfig::from_yaml("tempo: 120"),
            Err(GridError::ConfigError(_))
        ));
    }

    #[test]
    fn test_range_helpers() {
        let range = InclusiveRange { min: 1, max: 16 };
        assert!(range.contains(1));
        assert!(range.contains(16));
        assert!(!range.contains(0));
        assert!(!range.contains(17));
        assert_eq!(range.clamp(0), 1);
        assert_eq!(range.clamp(20), 16);
        assert_eq!(range.clamp(7), 7);
    }
}
