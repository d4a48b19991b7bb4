//! Comparator configuration

use crate::application::GoldenTester;
use crate::domain::errors::ComparatorError;
use crate::domain::value_objects::Tolerance;
use crate::infrastructure::{FailureArtifactWriter, LocalGoldenComparator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Set to any value to rewrite goldens instead of comparing against them
pub const UPDATE_GOLDENS_ENV: &str = "UPDATE_GOLDENS";
/// Overrides the configured tolerance, e.g. `GOLDEN_TOLERANCE=0.01`
pub const TOLERANCE_ENV: &str = "GOLDEN_TOLERANCE";

/// Comparator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Directory golden identifiers are resolved against
    pub base_dir: PathBuf,
    /// Allowed fraction of differing pixels
    pub tolerance: Tolerance,
    /// Overwrite goldens with the candidate instead of comparing
    pub auto_update: bool,
    /// Where to write diagnostic images on mismatch
    pub failures_dir: Option<PathBuf>,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("goldens"),
            tolerance: Tolerance::EXACT,
            auto_update: false,
            failures_dir: None,
        }
    }
}

impl ComparatorConfig {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file.
    ///
    /// A relative `base_dir` or `failures_dir` is taken relative to the file's
    /// directory.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ComparatorError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ComparatorError::io(path, e))?;

        let mut config: Self = serde_json::from_str(&content).map_err(|e| {
            ComparatorError::config(format!("Failed to parse {}: {e}", path.display()))
        })?;

        if let Some(root) = path.parent() {
            config.base_dir = anchor(root, &config.base_dir);
            config.failures_dir = config.failures_dir.map(|dir| anchor(root, &dir));
        }
        Ok(config)
    }

    /// Configuration for `base_dir` with overrides read from the environment.
    pub fn from_env<P: Into<PathBuf>>(base_dir: P) -> Result<Self, ComparatorError> {
        Self::new(base_dir).with_env_overrides()
    }

    /// Apply `UPDATE_GOLDENS` and `GOLDEN_TOLERANCE` on top of this configuration.
    pub fn with_env_overrides(self) -> Result<Self, ComparatorError> {
        self.with_overrides(
            std::env::var(UPDATE_GOLDENS_ENV).ok(),
            std::env::var(TOLERANCE_ENV).ok(),
        )
    }

    fn with_overrides(
        mut self,
        update: Option<String>,
        tolerance: Option<String>,
    ) -> Result<Self, ComparatorError> {
        if let Some(flag) = update {
            let flag = flag.trim();
            self.auto_update =
                !(flag.is_empty() || flag == "0" || flag.eq_ignore_ascii_case("false"));
        }

        if let Some(raw) = tolerance {
            let value: f64 = raw.trim().parse().map_err(|_| {
                ComparatorError::config(format!("{TOLERANCE_ENV} is not a number: '{raw}'"))
            })?;
            self.tolerance = Tolerance::new(value)?;
        }

        Ok(self)
    }

    pub fn build_comparator(&self) -> LocalGoldenComparator {
        let comparator = LocalGoldenComparator::new(&self.base_dir, self.tolerance);
        match &self.failures_dir {
            Some(dir) => comparator.with_failure_artifacts(FailureArtifactWriter::new(dir)),
            None => comparator,
        }
    }

    pub fn build_tester(&self) -> GoldenTester {
        GoldenTester::new(Arc::new(self.build_comparator()), self.auto_update)
    }
}

fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
