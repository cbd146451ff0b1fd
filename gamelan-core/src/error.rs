//! # Error Types
//!
//! Errors that can surface from the analysis pipeline. Everything here is a
//! plain value returned to the caller; nothing in the core retries.

use thiserror::Error;

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while segmenting, grouping or scoring a track.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An operation that needs at least one value was given none.
    #[error("{operation} requires a non-empty input")]
    EmptyInput { operation: &'static str },

    /// The candidate interval vector does not line up with a reference tuning.
    #[error("interval vector has {found} entries, reference tuning has {expected}")]
    LengthMismatch { expected: usize, found: usize },

    /// A scale start was found but fewer than six tones follow it.
    #[error("could not find a complete scale, only found {found} tones")]
    IncompleteScale { found: usize },

    /// No index in the distance sequence looks like the start of a scale.
    #[error("no scale found in the pitch classes")]
    NoScaleFound,

    /// A parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two arrays that describe the same frames disagree in shape.
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
