pub mod api;
pub mod axis;
pub mod config;
pub mod error;
pub mod pitch;
pub mod settings;
pub mod timing;
pub mod view;

pub use api::{load_view, render_grid, render_grid_json};
pub use axis::{LineStyle, NoteLine, PitchAxisMapper};
pub use config::{GridConfig, InclusiveRange, Zoom};
pub use error::*;
pub use pitch::{
    frequency_to_note, note_to_frequency, note_to_pitch_name, Accidental, MusicKey, NoteLetter,
    PitchName,
};
pub use settings::{SettingField, Settings};
pub use timing::{BarMarker, BeatGrid, BeatMarker, TimeScale};
pub use view::{
    estimate_note_from_click, AnnotationViewState, AuditionRequest, ClickEstimate, DirtyFlags,
    GridGeometry, ViewGeometry,
};
