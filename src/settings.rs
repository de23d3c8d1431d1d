//! # Settings Payload
//!
//! The four user-editable settings and their persisted JSON form.
//!
//! ## Wire Format
//! A flat JSON object with exactly these keys:
//! ```json
//! {"beats_offset": 0.0, "beats_per_bar": 4, "bpm": 120, "music_key": "C"}
//! ```
//!
//! ## Loading
//! Persisted objects may carry other keys (ignored) and may leave any setting out.
//! A missing key, `null` or `""` falls back to the default. Numbers stored as
//! strings (`"120"`) are accepted. A value of the wrong shape is logged and
//! replaced by the default; only unparsable JSON is an error.

use serde::Serialize;
use serde_json::Value;

use crate::error::GridError;

pub const DEFAULT_BEATS_OFFSET: f64 = 0.0;
pub const DEFAULT_BEATS_PER_BAR: u32 = 4;
pub const DEFAULT_BPM: u32 = 120;
pub const DEFAULT_MUSIC_KEY: &str = "C";

/// Snapshot of the editable settings, in persisted form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub beats_offset: f64,
    pub beats_per_bar: u32,
    pub bpm: u32,
    pub music_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            beats_offset: DEFAULT_BEATS_OFFSET,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
            bpm: DEFAULT_BPM,
            music_key: DEFAULT_MUSIC_KEY.to_string(),
        }
    }
}

/// One of the four editable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    BeatsOffset,
    BeatsPerBar,
    Bpm,
    MusicKey,
}

impl SettingField {
    /// Key used in the settings payload.
    pub fn key(self) -> &'static str {
        match self {
            SettingField::BeatsOffset => "beats_offset",
            SettingField::BeatsPerBar => "beats_per_bar",
            SettingField::Bpm => "bpm",
            SettingField::MusicKey => "music_key",
        }
    }
}

impl Settings {
    /// Read settings from a persisted JSON object, filling gaps with defaults.
    pub fn from_json(content: &str) -> Result<Self, GridError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| GridError::SettingsError(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, GridError> {
        let object = value.as_object().ok_or_else(|| {
            GridError::SettingsError("settings payload must be a JSON object".to_string())
        })?;
        let field = |f: SettingField| object.get(f.key()).filter(|v| is_present(v));

        let beats_offset = field(SettingField::BeatsOffset)
            .map(|v| number(v).filter(|n| n.is_finite()))
            .map(|n| or_default(SettingField::BeatsOffset, n, DEFAULT_BEATS_OFFSET))
            .unwrap_or(DEFAULT_BEATS_OFFSET);
        let beats_per_bar = field(SettingField::BeatsPerBar)
            .map(|v| number(v).and_then(whole))
            .map(|n| or_default(SettingField::BeatsPerBar, n, DEFAULT_BEATS_PER_BAR))
            .unwrap_or(DEFAULT_BEATS_PER_BAR);
        let bpm = field(SettingField::Bpm)
            .map(|v| number(v).and_then(whole))
            .map(|n| or_default(SettingField::Bpm, n, DEFAULT_BPM))
            .unwrap_or(DEFAULT_BPM);
        let music_key = field(SettingField::MusicKey)
            .map(|v| v.as_str().map(str::to_string))
            .map(|s| or_default(SettingField::MusicKey, s, DEFAULT_MUSIC_KEY.to_string()))
            .unwrap_or_else(|| DEFAULT_MUSIC_KEY.to_string());

        Ok(Self {
            beats_offset,
            beats_per_bar,
            bpm,
            music_key,
        })
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, GridError> {
        serde_json::to_string(self).map_err(|e| GridError::SettingsError(e.to_string()))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert to a whole `u32`, rejecting fractions and negative values.
pub(crate) fn whole(value: f64) -> Option<u32> {
    if value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

fn or_default<T: std::fmt::Debug>(field: SettingField, value: Option<T>, default: T) -> T {
    match value {
        Some(v) => v,
        None => {
            log::warn!(
                "Stored {} has an unusable value, using default {:?}",
                field.key(),
                default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_keys() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["beats_offset", "beats_per_bar", "bpm", "music_key"]);
        assert!(object["bpm"].is_u64());
        assert!(object["beats_per_bar"].is_u64());
        assert!(object["beats_offset"].is_f64());
        assert_eq!(object["music_key"], "C");
    }

    #[test]
    fn test_load_full_payload() {
        let settings = Settings::from_json(
            r#"{"beats_offset": -0.35, "beats_per_bar": 3, "bpm": 96, "music_key": "E♭"}"#,
        )
        .unwrap();
        assert_eq!(settings.beats_offset, -0.35);
        assert_eq!(settings.beats_per_bar, 3);
        assert_eq!(settings.bpm, 96);
        assert_eq!(settings.music_key, "E♭");
    }

    #[test]
    fn test_missing_null_and_empty_use_defaults() {
        let settings = Settings::from_json(
            r#"{"beats_offset": null, "bpm": "", "music_key": null, "audio_file_name": "song.wav"}"#,
        )
        .unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let settings =
            Settings::from_json(r#"{"beats_offset": "1.5", "beats_per_bar": "6", "bpm": "140"}"#)
                .unwrap();
        assert_eq!(settings.beats_offset, 1.5);
        assert_eq!(settings.beats_per_bar, 6);
        assert_eq!(settings.bpm, 140);
    }

    #[test]
    fn test_wrong_shapes_fall_back() {
        let settings = Settings::from_json(
            r#"{"beats_offset": [1], "beats_per_bar": 2.5, "bpm": -5, "music_key": 7}"#,
        )
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(GridError::SettingsError(_))
        ));
        assert!(matches!(
            Settings::from_json("[1, 2]"),
            Err(GridError::SettingsError(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = Settings {
            beats_offset: 0.125,
            beats_per_bar: 7,
            bpm: 180,
            music_key: "F♯".to_string(),
        };
        let loaded = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_field_keys_match_persisted_form() {
        let value: Value = serde_json::from_str(&Settings::default().to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            SettingField::BeatsOffset,
            SettingField::BeatsPerBar,
            SettingField::Bpm,
            SettingField::MusicKey,
        ] {
            assert!(object.contains_key(field.key()), "{}", field.key());
        }
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn test_whole() {
        assert_eq!(whole(4.0), Some(4));
        assert_eq!(whole(0.0), Some(0));
        assert_eq!(whole(4.5), None);
        assert_eq!(whole(-1.0), None);
        assert_eq!(whole(f64::NAN), None);
    }
}
