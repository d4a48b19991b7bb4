//! Error chain preservation tests
//! Validates that file system errors surface unwrapped through the error chain

use std::error::Error;
use golden_comparator::{ComparatorError, GoldenFileComparator, GoldenId, LocalGoldenComparator, Tolerance};

#[tokio::test]
async fn test_io_error_source_preserved() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is needed
    std::fs::write(dir.path().join("blocker"), b"not a dir").unwrap();
    let comparator = LocalGoldenComparator::new(dir.path(), Tolerance::EXACT);

    let error = comparator
        .update(&GoldenId::from("blocker/inner/golden.png"), b"bytes")
        .await
        .unwrap_err();

    match &error {
        ComparatorError::Io { path, source } => {
            assert!(path.starts_with(dir.path().join("blocker")));
            assert_ne!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected Io error, got: {other:?}"),
    }

    // Test the source() method works
    let source_error = error.source();
    assert!(source_error.is_some());
    assert!(
        source_error
            .unwrap()
            .downcast_ref::<std::io::Error>()
            .is_some()
    );
}

#[tokio::test]
async fn test_missing_golden_has_no_source() {
    let dir = tempfile::tempdir().unwrap();
    let comparator = LocalGoldenComparator::new(dir.path(), Tolerance::EXACT);

    let error = comparator
        .golden_bytes(&GoldenId::from("nope.png"))
        .await
        .unwrap_err();

    assert!(error.is_missing_golden());
    assert!(error.source().is_none());
}

#[test]
fn test_errors_convert_into_anyhow() {
    let error = ComparatorError::missing_golden("/goldens/a.png");
    let wrapped: anyhow::Error = error.into();
    assert!(wrapped.downcast_ref::<ComparatorError>().is_some());
}
