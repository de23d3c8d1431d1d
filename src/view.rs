//! # Annotation View State
//!
//! The single stateful object of the crate. It owns the four editable settings
//! (beat offset, beats per bar, BPM and music key), validates every edit, and
//! keeps the derived grid geometry up to date for the rendering layer.
//!
//! ## Edit Flow
//! 1. A setter validates the new value against the configured range
//! 2. On failure it returns [`GridError::ValidationFailed`]; nothing is changed
//! 3. On success the affected grid is regenerated, the value is stored and a
//!    dirty flag is raised
//! 4. The renderer calls [`AnnotationViewState::take_dirty`] and re-queries
//!    whatever changed
//!
//! Offset, BPM and beats-per-bar edits dirty the time grid; key edits dirty the
//! pitch labels. Both flags start raised so the first frame draws everything.
//!
//! ## Threading
//! The state has no interior locking. Keep one instance per open document and
//! drive it from a single thread.
//!
//! ## Example
//! ```rust
//! use transcriber::{AnnotationViewState, GridConfig, Settings, ViewGeometry};
//!
//! let config = GridConfig::default();
//! let geometry = ViewGeometry::for_spectrogram(&config, 10.0, 720.0);
//! let mut view = AnnotationViewState::new(config, &Settings::default(), 10.0, geometry)?;
//! view.take_dirty();
//!
//! view.set_bpm(90.0)?;
//! assert!(view.take_dirty().time_grid);
//! assert_eq!(view.export_settings().bpm, 90);
//! # Ok::<(), transcriber::GridError>(())
//! ```

use serde::Serialize;

use crate::axis::{NoteLine, PitchAxisMapper};
use crate::config::{GridConfig, InclusiveRange};
use crate::error::GridError;
use crate::pitch::{frequency_to_note, note_to_pitch_name, MusicKey};
use crate::settings::{
    whole, SettingField, Settings, DEFAULT_BEATS_OFFSET, DEFAULT_BEATS_PER_BAR, DEFAULT_BPM,
};
use crate::timing::{
    generate_bar_markers, generate_beat_markers, pixel_x_to_time, time_to_pixel_x, BarMarker,
    BeatGrid, BeatMarker, TimeScale,
};

/// How long an auditioned note plays, in seconds.
pub const AUDITION_SECONDS: f64 = 1.0;

/// Size of the spectrogram image and the zoom it is displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl ViewGeometry {
    pub fn new(display_width: f64, display_height: f64, x_scale: f64, y_scale: f64) -> Self {
        Self {
            display_width,
            display_height,
            x_scale,
            y_scale,
        }
    }

    /// Geometry of a spectrogram rendered at the configured resolution and zoom.
    pub fn for_spectrogram(config: &GridConfig, duration_seconds: f64, image_height: f64) -> Self {
        Self::new(
            duration_seconds * config.px_per_second,
            image_height,
            config.zoom.x,
            config.zoom.y,
        )
    }

    fn validate(&self) -> Result<(), GridError> {
        let fields = [
            ("display width", self.display_width, false),
            ("display height", self.display_height, true),
            ("x scale", self.x_scale, true),
            ("y scale", self.y_scale, true),
        ];
        for (name, value, must_be_positive) in fields {
            if !value.is_finite() || value < 0.0 || (must_be_positive && value == 0.0) {
                return Err(GridError::ConfigError(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Which parts of the grid changed since the renderer last looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub time_grid: bool,
    pub pitch_labels: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.time_grid || self.pitch_labels
    }
}

/// Result of inverse-mapping a click on the spectrogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEstimate {
    /// Nearest note number
    pub note: i32,
    /// Playback time under the click
    pub time_seconds: f64,
}

/// A request for the audio collaborator to play a note.
///
/// `name` uses ASCII accidentals (`C#`), the form synthesizers expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditionRequest {
    pub note: i32,
    pub name: String,
    pub octave: i32,
    pub seconds: f64,
}

impl AuditionRequest {
    pub fn for_note(note: i32) -> Self {
        let pitch = note_to_pitch_name(note, MusicKey::C);
        Self {
            note,
            name: pitch.ascii_name(),
            octave: pitch.octave,
            seconds: AUDITION_SECONDS,
        }
    }
}

/// Everything the renderer needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGeometry {
    pub geometry: ViewGeometry,
    pub note_lines: Vec<NoteLine>,
    pub beat_markers: Vec<BeatMarker>,
    pub bar_markers: Vec<BarMarker>,
    pub settings: Settings,
}

/// Map a click to the nearest note and the time under it.
///
/// `pixel_x`/`pixel_y` are on-screen coordinates, already multiplied by the zoom
/// factors; the note estimate is rounded half away from zero.
pub fn estimate_note_from_click(
    mapper: &PitchAxisMapper,
    pixel_x: f64,
    pixel_y: f64,
    axis_height: f64,
    px_per_second: f64,
    x_scale: f64,
    y_scale: f64,
) -> Result<ClickEstimate, GridError> {
    if !y_scale.is_finite() || y_scale <= 0.0 {
        return Err(GridError::InvalidInput(format!(
            "y scale must be positive, got {}",
            y_scale
        )));
    }
    let freq = mapper.pixel_y_to_frequency(pixel_y / y_scale, axis_height)?;
    let note = nearest_note(frequency_to_note(freq)?);
    let time_seconds = pixel_x_to_time(
        pixel_x,
        &TimeScale {
            px_per_second,
            x_scale,
        },
    )?;
    Ok(ClickEstimate { note, time_seconds })
}

/// Round a fractional note estimate, halves away from zero.
pub fn nearest_note(note: f64) -> i32 {
    note.round() as i32
}

#[derive(Debug, Clone, Default)]
struct GridCache {
    note_lines: Vec<NoteLine>,
    beat_markers: Vec<BeatMarker>,
    bar_markers: Vec<BarMarker>,
}

/// Mutable settings plus the grid geometry derived from them.
#[derive(Debug, Clone)]
pub struct AnnotationViewState {
    config: GridConfig,
    mapper: PitchAxisMapper,
    geometry: ViewGeometry,
    duration_seconds: f64,
    beats_offset: f64,
    beats_per_bar: u32,
    bpm: u32,
    music_key: MusicKey,
    cache: GridCache,
    dirty: DirtyFlags,
}

impl AnnotationViewState {
    /// Build the view for a recording of `duration_seconds`.
    ///
    /// Stored settings that fail validation are replaced by their defaults (pulled
    /// into the configured range if needed) and a warning is logged.
    ///
    /// # Errors
    /// [`GridError::ConfigError`] for an unusable configuration or geometry,
    /// [`GridError::InvalidInput`] for a negative or non-finite duration.
    pub fn new(
        config: GridConfig,
        settings: &Settings,
        duration_seconds: f64,
        geometry: ViewGeometry,
    ) -> Result<Self, GridError> {
        config.validate()?;
        geometry.validate()?;
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(GridError::InvalidInput(format!(
                "duration must be zero or positive, got {} s",
                duration_seconds
            )));
        }
        let mapper = PitchAxisMapper::new(config.note_range.min, config.note_range.max)?;

        let mut state = Self {
            beats_offset: DEFAULT_BEATS_OFFSET,
            beats_per_bar: config.beats_per_bar_range.clamp(DEFAULT_BEATS_PER_BAR),
            bpm: config.bpm_range.clamp(DEFAULT_BPM),
            music_key: MusicKey::default(),
            config,
            mapper,
            geometry,
            duration_seconds,
            cache: GridCache::default(),
            dirty: DirtyFlags::default(),
        };

        match state.validate_offset(settings.beats_offset) {
            Ok(value) => state.beats_offset = value,
            Err(e) => log::warn!("Ignoring stored beats_offset: {}", e),
        }
        match state.validate_beats_per_bar(settings.beats_per_bar as f64) {
            Ok(value) => state.beats_per_bar = value,
            Err(e) => log::warn!("Ignoring stored beats_per_bar: {}", e),
        }
        match state.validate_bpm(settings.bpm as f64) {
            Ok(value) => state.bpm = value,
            Err(e) => log::warn!("Ignoring stored bpm: {}", e),
        }
        match validate_key(&settings.music_key) {
            Ok(key) => state.music_key = key,
            Err(e) => log::warn!("Ignoring stored music_key: {}", e),
        }

        state.cache.note_lines = state.build_note_lines(state.music_key)?;
        let (beats, bars) = state.build_time_grid(state.beats_offset, state.beats_per_bar, state.bpm)?;
        state.cache.beat_markers = beats;
        state.cache.bar_markers = bars;
        state.dirty = DirtyFlags {
            time_grid: true,
            pitch_labels: true,
        };

        log::info!(
            "Loaded view: {:.2} s, {} BPM, {} beats per bar, offset {} s, key {}",
            state.duration_seconds,
            state.bpm,
            state.beats_per_bar,
            state.beats_offset,
            state.music_key
        );
        Ok(state)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn mapper(&self) -> &PitchAxisMapper {
        &self.mapper
    }

    pub fn geometry(&self) -> ViewGeometry {
        self.geometry
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn beats_offset(&self) -> f64 {
        self.beats_offset
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn music_key(&self) -> MusicKey {
        self.music_key
    }

    pub fn beat_grid(&self) -> BeatGrid {
        BeatGrid {
            bpm: self.bpm as f64,
            beats_per_bar: self.beats_per_bar,
            offset_seconds: self.beats_offset,
            duration_seconds: self.duration_seconds,
        }
    }

    pub fn time_scale(&self) -> TimeScale {
        TimeScale {
            px_per_second: self.config.px_per_second,
            x_scale: self.geometry.x_scale,
        }
    }

    // --- edits ---

    pub fn set_beat_offset(&mut self, value: f64) -> Result<(), GridError> {
        let offset = self.validate_offset(value).inspect_err(log_rejection)?;
        self.apply_time_grid(offset, self.beats_per_bar, self.bpm)
    }

    pub fn set_beats_per_bar(&mut self, value: f64) -> Result<(), GridError> {
        let beats_per_bar = self.validate_beats_per_bar(value).inspect_err(log_rejection)?;
        self.apply_time_grid(self.beats_offset, beats_per_bar, self.bpm)
    }

    pub fn set_bpm(&mut self, value: f64) -> Result<(), GridError> {
        let bpm = self.validate_bpm(value).inspect_err(log_rejection)?;
        self.apply_time_grid(self.beats_offset, self.beats_per_bar, bpm)
    }

    pub fn set_key(&mut self, value: &str) -> Result<(), GridError> {
        let key = validate_key(value).inspect_err(log_rejection)?;
        let note_lines = self.build_note_lines(key)?;
        self.music_key = key;
        self.cache.note_lines = note_lines;
        self.dirty.pitch_labels = true;
        log::debug!("Relabelled pitch axis for key {}", key);
        Ok(())
    }

    /// Apply raw text from one of the settings inputs.
    pub fn apply_input(&mut self, field: SettingField, text: &str) -> Result<(), GridError> {
        let text = text.trim();
        if text.is_empty() {
            let err = GridError::validation(field.key(), "a value is required");
            log_rejection(&err);
            return Err(err);
        }
        match field {
            SettingField::MusicKey => self.set_key(text),
            SettingField::BeatsOffset => self.set_beat_offset(parse_number(field, text)?),
            SettingField::BeatsPerBar => self.set_beats_per_bar(parse_number(field, text)?),
            SettingField::Bpm => self.set_bpm(parse_number(field, text)?),
        }
    }

    /// Return the dirty flags and clear them.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    // --- queries ---

    pub fn note_lines(&self) -> &[NoteLine] {
        &self.cache.note_lines
    }

    pub fn beat_markers(&self) -> &[BeatMarker] {
        &self.cache.beat_markers
    }

    pub fn bar_markers(&self) -> &[BarMarker] {
        &self.cache.bar_markers
    }

    /// Nearest note and playback time under an on-screen click.
    pub fn estimate_note_from_click(
        &self,
        pixel_x: f64,
        pixel_y: f64,
    ) -> Result<ClickEstimate, GridError> {
        estimate_note_from_click(
            &self.mapper,
            pixel_x,
            pixel_y,
            self.geometry.display_height,
            self.config.px_per_second,
            self.geometry.x_scale,
            self.geometry.y_scale,
        )
    }

    /// Audition request for the note under an on-screen click.
    pub fn audition_at(&self, pixel_x: f64, pixel_y: f64) -> Result<AuditionRequest, GridError> {
        let estimate = self.estimate_note_from_click(pixel_x, pixel_y)?;
        Ok(AuditionRequest::for_note(estimate.note))
    }

    /// On-screen x of the playhead at `time_seconds`.
    pub fn playhead_x(&self, time_seconds: f64) -> Result<f64, GridError> {
        time_to_pixel_x(time_seconds, &self.time_scale())
    }

    /// Playback time for a click on the bar-number ruler, kept inside the recording.
    pub fn seek_time(&self, pixel_x: f64) -> Result<f64, GridError> {
        let time = pixel_x_to_time(pixel_x, &self.time_scale())?;
        Ok(time.clamp(0.0, self.duration_seconds))
    }

    pub fn export_settings(&self) -> Settings {
        Settings {
            beats_offset: self.beats_offset,
            beats_per_bar: self.beats_per_bar,
            bpm: self.bpm,
            music_key: self.music_key.as_str().to_string(),
        }
    }

    pub fn snapshot(&self) -> GridGeometry {
        GridGeometry {
            geometry: self.geometry,
            note_lines: self.cache.note_lines.clone(),
            beat_markers: self.cache.beat_markers.clone(),
            bar_markers: self.cache.bar_markers.clone(),
            settings: self.export_settings(),
        }
    }

    // --- internals ---

    fn validate_offset(&self, value: f64) -> Result<f64, GridError> {
        if !value.is_finite() {
            return Err(GridError::validation(
                SettingField::BeatsOffset.key(),
                format!("{} is not a finite number of seconds", value),
            ));
        }
        Ok(value)
    }

    fn validate_beats_per_bar(&self, value: f64) -> Result<u32, GridError> {
        validate_count(SettingField::BeatsPerBar, value, &self.config.beats_per_bar_range)
    }

    fn validate_bpm(&self, value: f64) -> Result<u32, GridError> {
        validate_count(SettingField::Bpm, value, &self.config.bpm_range)
    }

    fn build_note_lines(&self, key: MusicKey) -> Result<Vec<NoteLine>, GridError> {
        self.mapper
            .note_lines(self.geometry.display_height, self.geometry.y_scale, key)
    }

    fn build_time_grid(
        &self,
        beats_offset: f64,
        beats_per_bar: u32,
        bpm: u32,
    ) -> Result<(Vec<BeatMarker>, Vec<BarMarker>), GridError> {
        let grid = BeatGrid {
            bpm: bpm as f64,
            beats_per_bar,
            offset_seconds: beats_offset,
            duration_seconds: self.duration_seconds,
        };
        let scale = self.time_scale();
        Ok((
            generate_beat_markers(&grid, &scale)?,
            generate_bar_markers(&grid, &scale)?,
        ))
    }

    /// Regenerate the time grid for new settings; state is only written once
    /// generation has succeeded.
    fn apply_time_grid(
        &mut self,
        beats_offset: f64,
        beats_per_bar: u32,
        bpm: u32,
    ) -> Result<(), GridError> {
        let (beats, bars) = self.build_time_grid(beats_offset, beats_per_bar, bpm)?;
        log::debug!(
            "Regenerated time grid: {} beats, {} bars ({} BPM, {}/bar, offset {} s)",
            beats.len(),
            bars.len(),
            bpm,
            beats_per_bar,
            beats_offset
        );
        self.beats_offset = beats_offset;
        self.beats_per_bar = beats_per_bar;
        self.bpm = bpm;
        self.cache.beat_markers = beats;
        self.cache.bar_markers = bars;
        self.dirty.time_grid = true;
        Ok(())
    }
}

fn validate_count(
    field: SettingField,
    value: f64,
    range: &InclusiveRange<u32>,
) -> Result<u32, GridError> {
    let whole_value = whole(value).ok_or_else(|| {
        GridError::validation(field.key(), format!("{} is not a whole number", value))
    })?;
    if !range.contains(whole_value) {
        return Err(GridError::validation(
            field.key(),
            format!("{} is outside {}..={}", whole_value, range.min, range.max),
        ));
    }
    Ok(whole_value)
}

fn validate_key(value: &str) -> Result<MusicKey, GridError> {
    MusicKey::parse(value).ok_or_else(|| {
        GridError::validation(
            SettingField::MusicKey.key(),
            format!("unknown key '{}'", value),
        )
    })
}

fn parse_number(field: SettingField, text: &str) -> Result<f64, GridError> {
    text.parse().map_err(|_| {
        let err = GridError::validation(field.key(), format!("'{}' is not a number", text));
        log_rejection(&err);
        err
    })
}

fn log_rejection(err: &GridError) {
    log::warn!("Rejected settings edit: {}", err);
}
