//! # Pitch Axis
//!
//! Maps frequencies onto the vertical axis of the spectrogram.
//!
//! The axis is logarithmic so that every semitone gets the same height. The
//! lowest displayed note sits at the bottom (`y = axis_height`) and the highest
//! at the top (`y = 0`), with the canvas origin in the top-left corner.
//!
//! ```text
//! y = (1 - (log2(f) - log2(f_min)) / (log2(f_max) - log2(f_min))) * axis_height
//! f = f_min^(y / axis_height) * f_max^(1 - y / axis_height)
//! ```
//!
//! ## Example
//! ```rust
//! use transcriber::axis::PitchAxisMapper;
//! use transcriber::pitch::note_to_frequency;
//!
//! let mapper = PitchAxisMapper::new(0, 119)?;
//! assert_eq!(mapper.frequency_to_pixel_y(note_to_frequency(0.0), 720.0)?, 720.0);
//! assert_eq!(mapper.frequency_to_pixel_y(note_to_frequency(119.0), 720.0)?, 0.0);
//! # Ok::<(), transcriber::GridError>(())
//! ```

use serde::Serialize;

use crate::error::GridError;
use crate::pitch::{check_frequency, note_to_frequency, note_to_pitch_name, MusicKey};

/// Stroke style of a pitch grid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Octave boundary (every C)
    Solid,
    Dashed,
}

/// Geometry for one note row on the pitch axis.
///
/// - `line_y`: grid line position, half a semitone below the note centre so the
///   gap between two lines is the note's row
/// - `label_y`: centre of the note's row, where the label is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteLine {
    pub note: i32,
    pub line_y: f64,
    pub label_y: f64,
    pub label: String,
    pub style: LineStyle,
}

/// Bidirectional mapping between note numbers, frequencies and pixel rows
/// over a fixed, inclusive note range.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchAxisMapper {
    min_note: i32,
    max_note: i32,
    min_freq: f64,
    max_freq: f64,
    log_min: f64,
    log_max: f64,
}

impl PitchAxisMapper {
    /// Create a mapper for the note range `[min_note, max_note]`.
    ///
    /// # Errors
    /// Returns [`GridError::ConfigError`] if `min_note >= max_note`.
    pub fn new(min_note: i32, max_note: i32) -> Result<Self, GridError> {
        if min_note >= max_note {
            return Err(GridError::ConfigError(format!(
                "note range is empty: min note {} must be below max note {}",
                min_note, max_note
            )));
        }
        let min_freq = note_to_frequency(min_note as f64);
        let max_freq = note_to_frequency(max_note as f64);
        Ok(Self {
            min_note,
            max_note,
            min_freq,
            max_freq,
            log_min: min_freq.log2(),
            log_max: max_freq.log2(),
        })
    }

    pub fn min_note(&self) -> i32 {
        self.min_note
    }

    pub fn max_note(&self) -> i32 {
        self.max_note
    }

    /// Map a frequency to a y coordinate on an axis `axis_height` pixels tall.
    pub fn frequency_to_pixel_y(&self, freq: f64, axis_height: f64) -> Result<f64, GridError> {
        check_frequency(freq)?;
        let ratio = (freq.log2() - self.log_min) / (self.log_max - self.log_min);
        Ok((1.0 - ratio) * axis_height)
    }

    /// Inverse of [`frequency_to_pixel_y`](Self::frequency_to_pixel_y).
    pub fn pixel_y_to_frequency(&self, y: f64, axis_height: f64) -> Result<f64, GridError> {
        if !axis_height.is_finite() || axis_height <= 0.0 {
            return Err(GridError::InvalidInput(format!(
                "axis height must be positive, got {}",
                axis_height
            )));
        }
        let ratio = y / axis_height;
        Ok(self.min_freq.powf(ratio) * self.max_freq.powf(1.0 - ratio))
    }

    /// Height of one semitone row in pixels.
    pub fn semitone_spacing_px(&self, axis_height: f64) -> f64 {
        axis_height / (self.max_note - self.min_note) as f64
    }

    /// Row geometry and labels for every note in range, lowest note first.
    ///
    /// `y_scale` is applied to every returned coordinate.
    pub fn note_lines(
        &self,
        axis_height: f64,
        y_scale: f64,
        key: MusicKey,
    ) -> Result<Vec<NoteLine>, GridError> {
        let half_row = self.semitone_spacing_px(axis_height) / 2.0;
        (self.min_note..=self.max_note)
            .map(|note| -> Result<NoteLine, GridError> {
                let y = self.frequency_to_pixel_y(note_to_frequency(note as f64), axis_height)?;
                let style = if note.rem_euclid(12) == 0 {
                    LineStyle::Solid
                } else {
                    LineStyle::Dashed
                };
                Ok(NoteLine {
                    note,
                    line_y: (y + half_row) * y_scale,
                    label_y: y * y_scale,
                    label: note_to_pitch_name(note, key).to_string(),
                    style,
                })
            })
            .collect()
    }
}
