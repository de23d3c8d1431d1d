//! Beat and bar marker generation
//!
//! Every position is computed from the beat index directly (no accumulation), so
//! markers far into a long recording carry no drift.

use super::types::{BarMarker, BeatGrid, BeatMarker, TimeScale};
use crate::error::GridError;

/// Upper bound on the beats in one grid; about 32 hours at 512 BPM.
pub const MAX_BEATS: u64 = 1_000_000;

/// Seconds between two beats at `bpm`.
pub fn seconds_per_beat(bpm: f64) -> Result<f64, GridError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(GridError::InvalidInput(format!(
            "tempo must be positive, got {} BPM",
            bpm
        )));
    }
    Ok(60.0 / bpm)
}

/// Seconds covered by one bar.
pub fn seconds_per_bar(bpm: f64, beats_per_bar: u32) -> Result<f64, GridError> {
    check_beats_per_bar(beats_per_bar)?;
    Ok(seconds_per_beat(bpm)? * beats_per_bar as f64)
}

/// Number of beats needed to cover `duration_seconds`, rounded up.
///
/// Fails with [`GridError::InvalidInput`] when the count would exceed [`MAX_BEATS`].
pub fn beat_count(bpm: f64, duration_seconds: f64) -> Result<u64, GridError> {
    seconds_per_beat(bpm)?;
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(GridError::InvalidInput(format!(
            "duration must be zero or positive, got {} s",
            duration_seconds
        )));
    }
    let beats = (bpm / 60.0 * duration_seconds).ceil();
    if beats > MAX_BEATS as f64 {
        return Err(GridError::InvalidInput(format!(
            "{} s at {} BPM needs {} beats, more than the limit of {}",
            duration_seconds, bpm, beats, MAX_BEATS
        )));
    }
    Ok(beats as u64)
}

/// Beat lines for beat indices `0..=beat_count`, in increasing order.
pub fn generate_beat_markers(
    grid: &BeatGrid,
    scale: &TimeScale,
) -> Result<Vec<BeatMarker>, GridError> {
    check_grid(grid)?;
    check_scale(scale)?;
    let count = beat_count(grid.bpm, grid.duration_seconds)?;
    let spb = seconds_per_beat(grid.bpm)?;
    let origin = grid.offset_seconds * scale.px_per_second;
    let beats_per_bar = grid.beats_per_bar as u64;

    Ok((0..=count)
        .map(|beat_index| BeatMarker {
            beat_index,
            pixel_x: (origin + beat_index as f64 * spb * scale.px_per_second) * scale.x_scale,
            is_bar_start: beat_index % beats_per_bar == 0,
        })
        .collect())
}

/// Bar markers numbered from 1, in increasing order.
pub fn generate_bar_markers(
    grid: &BeatGrid,
    scale: &TimeScale,
) -> Result<Vec<BarMarker>, GridError> {
    check_grid(grid)?;
    check_scale(scale)?;
    let beats = beat_count(grid.bpm, grid.duration_seconds)?;
    let bar_count = beats / grid.beats_per_bar as u64 + 1;
    let spbar = seconds_per_bar(grid.bpm, grid.beats_per_bar)?;
    let origin = grid.offset_seconds * scale.px_per_second;

    Ok((1..=bar_count)
        .map(|bar_number| BarMarker {
            bar_number,
            pixel_x: (origin + (bar_number - 1) as f64 * spbar * scale.px_per_second)
                * scale.x_scale,
        })
        .collect())
}

/// Playhead x position for a playback time.
pub fn time_to_pixel_x(time_seconds: f64, scale: &TimeScale) -> Result<f64, GridError> {
    check_scale(scale)?;
    Ok(time_seconds * scale.scaled_px_per_second())
}

/// Playback time for an on-screen x position (used when the ruler is clicked).
pub fn pixel_x_to_time(pixel_x: f64, scale: &TimeScale) -> Result<f64, GridError> {
    check_scale(scale)?;
    Ok(pixel_x / scale.x_scale / scale.px_per_second)
}

/// Length in seconds of `sample_count` samples.
pub fn duration_from_samples(sample_count: usize, sample_rate: f64) -> Result<f64, GridError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(GridError::InvalidInput(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )));
    }
    Ok(sample_count as f64 / sample_rate)
}

fn check_beats_per_bar(beats_per_bar: u32) -> Result<(), GridError> {
    if beats_per_bar == 0 {
        return Err(GridError::InvalidInput(
            "beats per bar must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn check_grid(grid: &BeatGrid) -> Result<(), GridError> {
    check_beats_per_bar(grid.beats_per_bar)?;
    if !grid.offset_seconds.is_finite() {
        return Err(GridError::InvalidInput(format!(
            "beat offset must be finite, got {}",
            grid.offset_seconds
        )));
    }
    Ok(())
}

fn check_scale(scale: &TimeScale) -> Result<(), GridError> {
    for (name, value) in [("pixels per second", scale.px_per_second), ("x scale", scale.x_scale)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GridError::InvalidInput(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
    }
    Ok(())
}
