//! # Public API
//!
//! One-call entry points for hosts that hold the configuration and settings as text.
//!
//! - [`load_view()`] - Build an [`AnnotationViewState`] from YAML config and JSON settings
//! - [`render_grid()`] - Build the view and return its geometry snapshot
//! - [`render_grid_json()`] - Same, serialized to JSON for a JS/canvas front end
//!
//! ## Typical Usage
//!
//! ```rust
//! use transcriber::render_grid;
//!
//! let config = "note-range: { min: 48, max: 84 }\npx-per-second: 100\nzoom: { x: 1, y: 1 }";
//! let settings = r#"{"bpm": 120, "beats_per_bar": 4, "music_key": "G"}"#;
//!
//! let grid = render_grid(config, settings, 10.0, 360.0)?;
//! assert_eq!(grid.note_lines.len(), 37);
//! assert_eq!(grid.beat_markers.len(), 21);
//! assert_eq!(grid.bar_markers.len(), 6);
//! # Ok::<(), transcriber::GridError>(())
//! ```

use crate::{AnnotationViewState, GridConfig, GridError, GridGeometry, Settings, ViewGeometry};

/// Build a view state from configuration and persisted settings.
///
/// # Parameters
/// - `config_yaml` - grid configuration (empty for defaults)
/// - `settings_json` - persisted settings object (`"{}"` for defaults)
/// - `duration_seconds` - length of the recording
/// - `image_height` - height of the spectrogram image in pixels
///
/// # Errors
/// Returns [`GridError`] if the configuration or settings cannot be read, or the
/// duration or image height is unusable.
pub fn load_view(
    config_yaml: &str,
    settings_json: &str,
    duration_seconds: f64,
    image_height: f64,
) -> Result<AnnotationViewState, GridError> {
    let config = GridConfig::from_yaml(config_yaml)?;
    let settings = Settings::from_json(settings_json)?;
    let geometry = ViewGeometry::for_spectrogram(&config, duration_seconds, image_height);
    AnnotationViewState::new(config, &settings, duration_seconds, geometry)
}

/// Build the view and return everything needed to draw the overlay.
pub fn render_grid(
    config_yaml: &str,
    settings_json: &str,
    duration_seconds: f64,
    image_height: f64,
) -> Result<GridGeometry, GridError> {
    Ok(load_view(config_yaml, settings_json, duration_seconds, image_height)?.snapshot())
}

/// [`render_grid()`] serialized to JSON.
pub fn render_grid_json(
    config_yaml: &str,
    settings_json: &str,
    duration_seconds: f64,
    image_height: f64,
) -> Result<String, GridError> {
    let grid = render_grid(config_yaml, settings_json, duration_seconds, image_height)?;
    serde_json::to_string_pretty(&grid).map_err(|e| GridError::SettingsError(e.to_string()))
}
