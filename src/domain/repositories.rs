//! Domain repository traits - Abstractions over golden file storage

use crate::domain::errors::ComparatorError;
use crate::domain::value_objects::{GoldenId, Tolerance};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Golden file comparison and update
///
/// Each operation is a one-shot file-system transaction scoped to a single golden
/// identifier. Operations on the same identifier are not sequenced; callers order
/// an `update` and a subsequent read themselves.
#[async_trait]
pub trait GoldenFileComparator: Send + Sync {
    /// Compare candidate image bytes with the stored golden.
    ///
    /// Returns `Ok(false)` on a pixel mismatch and
    /// [`ComparatorError::MissingGoldenFile`] when no golden exists, without
    /// invoking the image matcher.
    async fn compare(&self, candidate: &[u8], id: &GoldenId) -> Result<bool, ComparatorError>;

    /// Create or fully replace the golden file, creating parent directories.
    async fn update(&self, id: &GoldenId, bytes: &[u8]) -> Result<(), ComparatorError>;

    /// Read the stored golden bytes unmodified.
    async fn golden_bytes(&self, id: &GoldenId) -> Result<Vec<u8>, ComparatorError>;

    /// Check whether a golden file exists for the identifier
    async fn exists(&self, id: &GoldenId) -> Result<bool, ComparatorError>;

    /// Absolute location of the golden file for `id`
    fn resolve(&self, id: &GoldenId) -> Result<PathBuf, ComparatorError>;

    fn tolerance(&self) -> Tolerance;
}

/// Anything that knows where goldens live.
///
/// Used to derive a comparator from an existing comparator configuration.
pub trait BaseDirProvider {
    fn basedir(&self) -> &Path;
}

impl BaseDirProvider for Path {
    fn basedir(&self) -> &Path {
        self
    }
}

impl BaseDirProvider for PathBuf {
    fn basedir(&self) -> &Path {
        self.as_path()
    }
}
