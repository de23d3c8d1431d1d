//! Timing grid type definitions

use serde::Serialize;

/// Tempo and bar layout of a recording.
///
/// # Fields
/// - `bpm`: Tempo in beats per minute
/// - `beats_per_bar`: Number of beats in one bar
/// - `offset_seconds`: When beat 0 happens; negative values shift the grid left
/// - `duration_seconds`: Length of the audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatGrid {
    pub bpm: f64,
    pub beats_per_bar: u32,
    pub offset_seconds: f64,
    pub duration_seconds: f64,
}

/// Horizontal scaling from seconds to on-screen pixels.
///
/// `px_per_second` is the spectrogram image resolution; `x_scale` is the zoom
/// applied on top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub px_per_second: f64,
    pub x_scale: f64,
}

impl TimeScale {
    /// On-screen pixels per second of audio.
    pub fn scaled_px_per_second(&self) -> f64 {
        self.px_per_second * self.x_scale
    }
}

/// One beat line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatMarker {
    pub beat_index: u64,
    pub pixel_x: f64,
    pub is_bar_start: bool,
}

/// One bar-number marker (bar numbers start at 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarMarker {
    pub bar_number: u64,
    pub pixel_x: f64,
}

impl BarMarker {
    /// Text drawn in the bar-number ruler.
    pub fn label(&self) -> String {
        self.bar_number.to_string()
    }
}
