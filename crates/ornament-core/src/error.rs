//! Error types for the ornament scene.
//!
//! None of these are fatal to the scene itself; callers log them and fall
//! back to the next strategy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("photo manifest unavailable: {0}")]
    ManifestUnavailable(String),

    #[error("photo manifest is not a JSON list of photos: {0}")]
    ManifestParse(String),

    #[error("failed to load photo {path}: {reason}")]
    PhotoLoad { path: String, reason: String },

    #[error("photo capacity reached ({max} photos)")]
    PhotoCapacity { max: usize },

    #[error("invalid hand landmarks: expected {expected} points, got {actual}")]
    InvalidLandmarks { expected: usize, actual: usize },

    #[error("hand tracker error: {0}")]
    Tracker(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ManifestParse(e.to_string())
    }
}
