//! Infrastructure implementations of repository traits

use crate::domain::errors::ComparatorError;
use crate::domain::repositories::{BaseDirProvider, GoldenFileComparator};
use crate::domain::services::ImageMatcher;
use crate::domain::value_objects::{GoldenId, Tolerance};
use crate::infrastructure::failure_artifacts::FailureArtifactWriter;
use crate::infrastructure::pixel_matcher::PixelMatcher;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File system implementation of GoldenFileComparator
///
/// Goldens are stored verbatim at `base_dir/<golden id>`. Construction never
/// touches the file system.
#[derive(Clone)]
pub struct LocalGoldenComparator {
    base_dir: PathBuf,
    tolerance: Tolerance,
    matcher: Arc<dyn ImageMatcher>,
    failures: Option<FailureArtifactWriter>,
}

impl LocalGoldenComparator {
    pub fn new<P: Into<PathBuf>>(base_dir: P, tolerance: Tolerance) -> Self {
        Self {
            base_dir: base_dir.into(),
            tolerance,
            matcher: Arc::new(PixelMatcher),
            failures: None,
        }
    }

    /// Derive a comparator from anything exposing a base directory.
    pub fn from_provider<B: BaseDirProvider + ?Sized>(provider: &B, tolerance: Tolerance) -> Self {
        Self::new(provider.basedir(), tolerance)
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn ImageMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_failure_artifacts(mut self, writer: FailureArtifactWriter) -> Self {
        self.failures = Some(writer);
        self
    }

    async fn read_golden(&self, id: &GoldenId) -> Result<(PathBuf, Vec<u8>), ComparatorError> {
        let path = self.resolve(id)?;
        let bytes = read_file(&path).await.inspect_err(|e| {
            if e.is_missing_golden() {
                log::debug!("Golden '{id}' not found at {}", path.display());
            }
        })?;
        log::debug!("Read {} bytes for golden '{id}'", bytes.len());
        Ok((path, bytes))
    }
}

impl BaseDirProvider for LocalGoldenComparator {
    fn basedir(&self) -> &Path {
        &self.base_dir
    }
}

impl std::fmt::Debug for LocalGoldenComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGoldenComparator")
            .field("base_dir", &self.base_dir)
            .field("tolerance", &self.tolerance)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GoldenFileComparator for LocalGoldenComparator {
    async fn compare(&self, candidate: &[u8], id: &GoldenId) -> Result<bool, ComparatorError> {
        let (path, golden) = self.read_golden(id).await?;

        let matched = self.matcher.matches(candidate, &golden, self.tolerance);
        if matched {
            log::debug!("Golden '{id}' matched");
            return Ok(true);
        }

        log::debug!(
            "Golden '{id}' at {} did not match (tolerance {})",
            path.display(),
            self.tolerance
        );
        if let Some(writer) = &self.failures
            && let Err(e) = writer.write(id, candidate, &golden).await
        {
            log::warn!("Failed to write failure artifacts for '{id}': {e}");
        }
        Ok(false)
    }

    async fn update(&self, id: &GoldenId, bytes: &[u8]) -> Result<(), ComparatorError> {
        let path = self.resolve(id)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ComparatorError::io(parent, e))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ComparatorError::io(&path, e))?;

        log::info!("Updated golden '{id}' ({} bytes) at {}", bytes.len(), path.display());
        Ok(())
    }

    async fn golden_bytes(&self, id: &GoldenId) -> Result<Vec<u8>, ComparatorError> {
        let (_, bytes) = self.read_golden(id).await?;
        Ok(bytes)
    }

    async fn exists(&self, id: &GoldenId) -> Result<bool, ComparatorError> {
        let path = self.resolve(id)?;
        file_exists(&path).await
    }

    fn resolve(&self, id: &GoldenId) -> Result<PathBuf, ComparatorError> {
        id.resolve_under(&self.base_dir)
    }

    fn tolerance(&self) -> Tolerance {
        self.tolerance
    }
}

async fn file_exists(path: &Path) -> Result<bool, ComparatorError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ComparatorError::io(path, e)),
    }
}

/// Read a golden in a single call; absence is always `MissingGoldenFile`.
async fn read_file(path: &Path) -> Result<Vec<u8>, ComparatorError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ComparatorError::missing_golden(path))
        }
        // A directory in place of the golden is not a golden
        Err(e) => match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => Err(ComparatorError::missing_golden(path)),
            _ => Err(ComparatorError::io(path, e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMatcher {
        calls: AtomicUsize,
    }

    impl ImageMatcher for CountingMatcher {
        fn matches(&self, candidate: &[u8], golden: &[u8], _tolerance: Tolerance) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            candidate == golden
        }
    }

    #[test]
    fn construction_does_not_touch_file_system() {
        let comparator =
            LocalGoldenComparator::new("/definitely/not/a/real/dir", Tolerance::EXACT);
        assert_eq!(comparator.basedir(), Path::new("/definitely/not/a/real/dir"));
        assert!(!Path::new("/definitely/not/a/real/dir").exists());
    }

    #[tokio::test]
    async fn missing_golden_short_circuits_matcher() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = Arc::new(CountingMatcher {
            calls: AtomicUsize::new(0),
        });
        let comparator = LocalGoldenComparator::new(dir.path(), Tolerance::EXACT)
            .with_matcher(matcher.clone());

        let err = comparator
            .compare(b"bytes", &GoldenId::from("absent.png"))
            .await
            .unwrap_err();
        assert!(err.is_missing_golden());
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matcher_receives_configured_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let tolerance = Tolerance::new(0.3).unwrap();
        let matcher = Arc::new(move |_: &[u8], _: &[u8], t: Tolerance| t == tolerance);
        let comparator =
            LocalGoldenComparator::new(dir.path(), tolerance).with_matcher(matcher);

        let id = GoldenId::from("t.png");
        comparator.update(&id, b"golden").await.unwrap();
        assert!(comparator.compare(b"anything", &id).await.unwrap());
    }

    #[tokio::test]
    async fn directory_at_golden_path_is_not_a_golden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("folder.png")).unwrap();
        let comparator = LocalGoldenComparator::new(dir.path(), Tolerance::EXACT);

        let id = GoldenId::from("folder.png");
        assert!(!comparator.exists(&id).await.unwrap());
        assert!(comparator.golden_bytes(&id).await.unwrap_err().is_missing_golden());
    }

    #[tokio::test]
    async fn golden_removed_before_read_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        std::fs::write(&path, b"bytes").unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = read_file(&path).await.unwrap_err();
        assert!(err.is_missing_golden(), "got {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_golden_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.png"), dir.path().join("link.png"))
            .unwrap();
        let comparator = LocalGoldenComparator::new(dir.path(), Tolerance::EXACT);

        let err = comparator
            .compare(b"bytes", &GoldenId::from("link.png"))
            .await
            .unwrap_err();
        assert!(err.is_missing_golden(), "got {err:?}");
    }

    #[tokio::test]
    async fn mismatch_writes_failure_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let failures = dir.path().join("failures");
        let comparator = LocalGoldenComparator::new(dir.path().join("goldens"), Tolerance::EXACT)
            .with_failure_artifacts(FailureArtifactWriter::new(&failures));

        let id = GoldenId::from("nested/button.png");
        comparator.update(&id, b"golden").await.unwrap();
        assert!(!comparator.compare(b"candidate", &id).await.unwrap());

        assert_eq!(
            std::fs::read(failures.join("nested").join("button.png_masterImage.png")).unwrap(),
            b"golden"
        );
        assert_eq!(
            std::fs::read(failures.join("nested").join("button.png_testImage.png")).unwrap(),
            b"candidate"
        );
        // Neither payload decodes, so there is no isolated diff.
        assert!(!failures.join("nested").join("button.png_isolatedDiff.png").exists());
    }
}
