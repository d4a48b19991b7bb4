//! Domain services - Image matching predicate

use crate::domain::value_objects::Tolerance;

/// Decides whether a candidate image matches a golden image.
///
/// Implementations must be pure: the same inputs always give the same answer and
/// neither byte slice is modified.
pub trait ImageMatcher: Send + Sync {
    fn matches(&self, candidate: &[u8], golden: &[u8], tolerance: Tolerance) -> bool;
}

/// Byte-for-byte equality; the tolerance is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactBytesMatcher;

impl ImageMatcher for ExactBytesMatcher {
    fn matches(&self, candidate: &[u8], golden: &[u8], _tolerance: Tolerance) -> bool {
        candidate == golden
    }
}

impl<F> ImageMatcher for F
where
    F: Fn(&[u8], &[u8], Tolerance) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &[u8], golden: &[u8], tolerance: Tolerance) -> bool {
        self(candidate, golden, tolerance)
    }
}
