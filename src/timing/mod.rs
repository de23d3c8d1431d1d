//! # Timing Module
//!
//! Generate beat and bar markers for the horizontal (time) axis of the spectrogram.
//!
//! ## Purpose
//! Given a tempo, a bar length, a beat offset and the audio duration, this module
//! produces the x positions of:
//! 1. **Beat lines** - one per beat, flagged when the beat starts a bar
//! 2. **Bar markers** - numbered from 1, used for the bar-number ruler
//!
//! It also maps playback time to the playhead position and back.
//!
//! ## Sub-modules
//! - `types` - BeatGrid, TimeScale, BeatMarker, BarMarker
//! - `engine` - Marker generation and time/pixel conversions
//!
//! ## Grid Length
//! The number of beats is `ceil(bpm / 60 * duration)`. Beat indices run from 0 up
//! to and including that count, so there is always one marker past the last full
//! beat and the grid covers a trailing partial beat. Grids longer than
//! [`MAX_BEATS`] beats are rejected instead of generated.
//!
//! Bars are derived from the beat count directly (`floor(beats / beats_per_bar) + 1`)
//! rather than filtered from the beat markers, but a bar marker always lands on the
//! same x as the beat that starts it.
//!
//! ## Example
//! ```rust
//! use transcriber::timing::{generate_bar_markers, generate_beat_markers, BeatGrid, TimeScale};
//!
//! let grid = BeatGrid { bpm: 120.0, beats_per_bar: 4, offset_seconds: 0.0, duration_seconds: 10.0 };
//! let scale = TimeScale { px_per_second: 100.0, x_scale: 1.0 };
//!
//! let beats = generate_beat_markers(&grid, &scale)?;
//! assert_eq!(beats.len(), 21);
//! assert_eq!(beats[1].pixel_x, 50.0);
//!
//! let bars = generate_bar_markers(&grid, &scale)?;
//! assert_eq!(bars.len(), 6);
//! assert_eq!(bars[1].pixel_x, 200.0);
//! # Ok::<(), transcriber::GridError>(())
//! ```

mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{
    beat_count, duration_from_samples, generate_bar_markers, generate_beat_markers,
    pixel_x_to_time, seconds_per_bar, seconds_per_beat, time_to_pixel_x, MAX_BEATS,
};
pub use types::{BarMarker, BeatGrid, BeatMarker, TimeScale};
