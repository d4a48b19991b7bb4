//! Application use cases - Golden checks as a test harness sees them

use crate::domain::errors::ComparatorError;
use crate::domain::repositories::GoldenFileComparator;
use crate::domain::value_objects::GoldenId;
use std::sync::Arc;

/// Outcome of a golden check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenVerdict {
    Matched,
    Mismatched,
    /// The golden was rewritten with the candidate bytes
    Updated,
}

/// Compare-or-update entry point used by screenshot tests
///
/// With `auto_update` set every check rewrites the golden; otherwise it compares
/// and a missing golden is reported as [`ComparatorError::MissingGoldenFile`].
#[derive(Clone)]
pub struct GoldenTester {
    comparator: Arc<dyn GoldenFileComparator>,
    auto_update: bool,
}

impl GoldenTester {
    pub fn new(comparator: Arc<dyn GoldenFileComparator>, auto_update: bool) -> Self {
        Self {
            comparator,
            auto_update,
        }
    }

    pub fn comparator(&self) -> &Arc<dyn GoldenFileComparator> {
        &self.comparator
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    pub async fn check(
        &self,
        id: impl Into<GoldenId>,
        candidate: &[u8],
    ) -> Result<GoldenVerdict, ComparatorError> {
        let id = id.into();

        if self.auto_update {
            self.comparator.update(&id, candidate).await?;
            return Ok(GoldenVerdict::Updated);
        }

        if self.comparator.compare(candidate, &id).await? {
            Ok(GoldenVerdict::Matched)
        } else {
            log::warn!("Golden '{id}' does not match candidate ({} bytes)", candidate.len());
            Ok(GoldenVerdict::Mismatched)
        }
    }

    /// Like [`check`](Self::check) but a mismatch becomes [`ComparatorError::Mismatch`].
    pub async fn assert_matches(
        &self,
        id: impl Into<GoldenId>,
        candidate: &[u8],
    ) -> Result<GoldenVerdict, ComparatorError> {
        let id = id.into();
        match self.check(id.clone(), candidate).await? {
            GoldenVerdict::Mismatched => Err(ComparatorError::Mismatch { id }),
            verdict => Ok(verdict),
        }
    }
}

impl std::fmt::Debug for GoldenTester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoldenTester")
            .field("auto_update", &self.auto_update)
            .finish_non_exhaustive()
    }
}
