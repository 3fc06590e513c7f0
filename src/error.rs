//! # Error Types
//!
//! This module defines all error types for the tranh tablature core.
//!
//! Per-note data problems (a note with no readable pitch, a missing duration) are
//! never errors: those notes are skipped or defaulted where they are consumed.
//! Errors are reserved for inputs the caller controls, such as a tuning string
//! or a layout configuration file.
//!
//! ## Error Types
//! - `InvalidTuning` - A tuning string that cannot be split into pitch classes
//! - `EmptyCandidates` - Tuning search called with no candidates to try
//! - `ConfigError` - Invalid YAML layout configuration or tuning catalog
//! - `SongError` - A song file that cannot be deserialized
//!
//! ## Usage
//! ```rust
//! use tranh::{count_bent_notes, TranhError};
//!
//! match count_bent_notes(&[], "C-D-H-G-A") {
//!     Ok(bent) => println!("{} bent notes", bent),
//!     Err(TranhError::InvalidTuning { tuning, message }) => {
//!         eprintln!("Bad tuning '{}': {}", tuning, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranhError {
    /// Tuning string could not be parsed.
    ///
    /// Tunings are static configuration (`"C-D-E-G-A"`), so a malformed one is a
    /// caller mistake and is surfaced instead of being silently replaced.
    ///
    /// # Example
    /// ```
    /// # use tranh::TranhError;
    /// let err = TranhError::InvalidTuning {
    ///     tuning: "C-D-X".to_string(),
    ///     message: "unknown pitch class 'X'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid tuning 'C-D-X': unknown pitch class 'X'");
    /// ```
    #[error("Invalid tuning '{tuning}': {message}")]
    InvalidTuning { tuning: String, message: String },

    /// The candidate tuning list passed to the optimizer was empty.
    ///
    /// # Example
    /// ```
    /// # use tranh::TranhError;
    /// let err = TranhError::EmptyCandidates;
    /// assert_eq!(err.to_string(), "No candidate tunings to evaluate");
    /// ```
    #[error("No candidate tunings to evaluate")]
    EmptyCandidates,

    /// Invalid layout configuration or tuning catalog.
    ///
    /// # Example
    /// ```
    /// # use tranh::TranhError;
    /// let err = TranhError::ConfigError("pixels-per-beat must be positive".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: pixels-per-beat must be positive");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Song data could not be read.
    #[error("Invalid song data: {0}")]
    SongError(String),
}
