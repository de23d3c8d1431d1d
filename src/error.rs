//! # Error Types
//!
//! All fallible operations in the crate return [`GridError`].
//!
//! ## Error Types
//! - `InvalidInput` - a pure conversion received a value outside its domain
//!   (non-positive frequency or tempo, zero beats per bar, non-finite numbers)
//! - `ValidationFailed` - a settings edit was rejected; the view state is unchanged
//! - `ConfigError` - the grid configuration is unusable (detected at initialization)
//! - `SettingsError` - a persisted settings payload could not be read
//!
//! ## Usage
//! ```rust
//! use transcriber::{AnnotationViewState, GridConfig, GridError, Settings, ViewGeometry};
//!
//! let config = GridConfig::default();
//! let geometry = ViewGeometry::for_spectrogram(&config, 10.0, 720.0);
//! let mut view = AnnotationViewState::new(config, &Settings::default(), 10.0, geometry)?;
//!
//! match view.set_bpm(-5.0) {
//!     Err(GridError::ValidationFailed { field, .. }) => assert_eq!(field, "bpm"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! assert_eq!(view.bpm(), 120);
//! # Ok::<(), GridError>(())
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A conversion function was called with a value it cannot map.
    ///
    /// # Example
    /// ```
    /// # use transcriber::GridError;
    /// let err = GridError::InvalidInput("frequency must be positive, got 0".to_string());
    /// assert_eq!(err.to_string(), "Invalid input: frequency must be positive, got 0");
    /// ```
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A settings edit was rejected by its range or format check.
    ///
    /// The previously stored value is retained.
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// The grid configuration cannot be used (e.g. an empty note range).
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A persisted settings payload is malformed.
    #[error("Invalid settings: {0}")]
    SettingsError(String),
}

impl GridError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        GridError::ValidationFailed {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
