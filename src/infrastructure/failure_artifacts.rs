//! Writes diagnostic images when a golden comparison fails

use crate::domain::errors::ComparatorError;
use crate::domain::value_objects::GoldenId;
use crate::infrastructure::pixel_matcher::PixelMatcher;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Writes `<name>_masterImage.png`, `<name>_testImage.png` and, when the images
/// are comparable, `<name>_isolatedDiff.png` into a failures directory.
///
/// The golden id's directories are mirrored under the failures directory and
/// `<name>` is the id's full file name, so distinct goldens never share
/// artifacts: `ui/button.png` fails into `ui/button.png_masterImage.png`.
#[derive(Debug, Clone)]
pub struct FailureArtifactWriter {
    dir: PathBuf,
}

impl FailureArtifactWriter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn master_path(&self, id: &GoldenId) -> Result<PathBuf, ComparatorError> {
        self.artifact_path(id, "masterImage")
    }

    pub fn test_path(&self, id: &GoldenId) -> Result<PathBuf, ComparatorError> {
        self.artifact_path(id, "testImage")
    }

    pub fn isolated_diff_path(&self, id: &GoldenId) -> Result<PathBuf, ComparatorError> {
        self.artifact_path(id, "isolatedDiff")
    }

    fn artifact_path(&self, id: &GoldenId, kind: &str) -> Result<PathBuf, ComparatorError> {
        let mirrored = id.resolve_under(&self.dir)?;
        let name = mirrored
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(mirrored.with_file_name(format!("{name}_{kind}.png")))
    }

    /// Write all artifacts for a failed comparison and return the written paths.
    pub async fn write(
        &self,
        id: &GoldenId,
        candidate: &[u8],
        golden: &[u8],
    ) -> Result<Vec<PathBuf>, ComparatorError> {
        let master = self.master_path(id)?;
        if let Some(parent) = master.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ComparatorError::io(parent, e))?;
        }

        let mut written = Vec::with_capacity(3);

        write_file(&master, golden).await?;
        written.push(master);

        let test = self.test_path(id)?;
        write_file(&test, candidate).await?;
        written.push(test);

        if let Some(diff) = PixelMatcher.isolated_diff(candidate, golden) {
            let mut encoded = Vec::new();
            let encoded_result = diff.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png);
            match encoded_result {
                Ok(()) => {
                    let path = self.isolated_diff_path(id)?;
                    write_file(&path, &encoded).await?;
                    written.push(path);
                }
                Err(e) => log::warn!("Failed to encode isolated diff for '{id}': {e}"),
            }
        }

        log::info!(
            "Wrote {} failure artifact(s) for '{id}' to {}",
            written.len(),
            self.dir.display()
        );
        Ok(written)
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ComparatorError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ComparatorError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_mirror_golden_directories() {
        let writer = FailureArtifactWriter::new("/f");
        assert_eq!(
            writer.master_path(&GoldenId::from("ui/button.png")).unwrap(),
            Path::new("/f").join("ui").join("button.png_masterImage.png")
        );
    }

    #[test]
    fn distinct_goldens_get_distinct_artifacts() {
        let writer = FailureArtifactWriter::new("/f");
        let ids = ["a/b_c.png", "a_b/c.png", "a/b_c", "a/b/c.png"];
        for (i, left) in ids.iter().enumerate() {
            for right in &ids[i + 1..] {
                let left_id = GoldenId::from(*left);
                let right_id = GoldenId::from(*right);
                assert_ne!(
                    writer.master_path(&left_id).unwrap(),
                    writer.master_path(&right_id).unwrap(),
                    "{left} and {right} share artifacts"
                );
                assert_ne!(
                    writer.isolated_diff_path(&left_id).unwrap(),
                    writer.isolated_diff_path(&right_id).unwrap()
                );
            }
        }
    }

    #[tokio::test]
    async fn colliding_flat_names_keep_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FailureArtifactWriter::new(dir.path());
        let first = GoldenId::from("a/b_c.png");
        let second = GoldenId::from("a_b/c.png");

        writer.write(&first, b"first test", b"first master").await.unwrap();
        writer.write(&second, b"second test", b"second master").await.unwrap();

        assert_eq!(
            std::fs::read(writer.master_path(&first).unwrap()).unwrap(),
            b"first master"
        );
        assert_eq!(
            std::fs::read(writer.test_path(&second).unwrap()).unwrap(),
            b"second test"
        );
    }

    #[tokio::test]
    async fn escaping_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FailureArtifactWriter::new(dir.path().join("failures"));
        let err = writer
            .write(&GoldenId::from("../x.png"), b"t", b"m")
            .await
            .unwrap_err();
        assert!(matches!(err, ComparatorError::InvalidGoldenId { .. }));
    }
}
