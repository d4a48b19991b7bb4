//! Domain errors

use crate::domain::value_objects::GoldenId;
use std::path::PathBuf;
use thiserror::Error;

/// Message fragment shared by every read of a missing golden file.
pub const MISSING_GOLDEN_MESSAGE: &str = "Could not be compared against non-existent file";

/// Errors surfaced by golden comparison and update.
///
/// A pixel mismatch is not an error at the comparator layer; `compare` returns
/// `Ok(false)` for it. Only [`GoldenTester::assert_matches`] turns it into
/// [`ComparatorError::Mismatch`].
///
/// [`GoldenTester::assert_matches`]: crate::application::GoldenTester::assert_matches
#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("Could not be compared against non-existent file: \"{}\"", .path.display())]
    MissingGoldenFile { path: PathBuf },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tolerance {value}: must be within [0, 1]")]
    InvalidTolerance { value: f64 },

    #[error("Invalid golden identifier '{id}': {reason}")]
    InvalidGoldenId { id: GoldenId, reason: String },

    #[error("Golden '{id}' does not match the candidate image. Run with UPDATE_GOLDENS=1 to update.")]
    Mismatch { id: GoldenId },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ComparatorError {
    pub fn missing_golden(path: impl Into<PathBuf>) -> Self {
        Self::MissingGoldenFile { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_golden_id(id: impl Into<GoldenId>, reason: impl Into<String>) -> Self {
        Self::InvalidGoldenId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error reports an absent golden file.
    pub fn is_missing_golden(&self) -> bool {
        matches!(self, Self::MissingGoldenFile { .. })
    }
}
