//! Domain value objects - Immutable objects that describe aspects of the domain

use crate::domain::errors::ComparatorError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Macro to implement common traits for string wrapper types
macro_rules! impl_string_wrapper {
    ($type:ident) => {
        impl From<String> for $type {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $type {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Relative identifier of a golden image, e.g. `"widgets/button/pressed.png"`.
///
/// Segments are split with the platform's separator rules (`/` everywhere, `\`
/// as well on Windows) and joined onto the base directory one by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoldenId(String);

impl GoldenId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments of the identifier.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(std::path::is_separator)
            .filter(|s| !s.is_empty() && *s != ".")
    }

    /// Join this identifier onto `base_dir`.
    ///
    /// Rejects empty identifiers, absolute paths and `..` segments so a golden can
    /// never resolve outside of the base directory.
    pub fn resolve_under(&self, base_dir: &Path) -> Result<PathBuf, ComparatorError> {
        if self.segments().next().is_none() {
            return Err(ComparatorError::invalid_golden_id(
                self.clone(),
                "identifier is empty",
            ));
        }

        let raw = Path::new(&self.0);
        if raw.is_absolute() || raw.has_root() || self.0.starts_with('/') {
            return Err(ComparatorError::invalid_golden_id(
                self.clone(),
                "identifier must be relative to the base directory",
            ));
        }

        let mut path = base_dir.to_path_buf();
        for segment in self.segments() {
            if Path::new(segment)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
            {
                return Err(ComparatorError::invalid_golden_id(
                    self.clone(),
                    format!("segment '{segment}' is not allowed"),
                ));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl_string_wrapper!(GoldenId);

/// Allowed fraction of differing pixels, in `[0, 1]`. Zero means exact match.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    pub const EXACT: Tolerance = Tolerance(0.0);

    pub fn new(value: f64) -> Result<Self, ComparatorError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ComparatorError::InvalidTolerance { value });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_exact(&self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ComparatorError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_id_resolves_under_base() {
        let base = Path::new("goldens");
        let path = GoldenId::from("nested/dir/name.png")
            .resolve_under(base)
            .unwrap();
        assert_eq!(path, base.join("nested").join("dir").join("name.png"));
    }

    #[test]
    fn redundant_separators_are_ignored() {
        let base = Path::new("goldens");
        let path = GoldenId::from("a//./b.png").resolve_under(base).unwrap();
        assert_eq!(path, base.join("a").join("b.png"));
    }

    #[test]
    fn absolute_and_parent_ids_are_rejected() {
        let base = Path::new("goldens");
        for id in ["/etc/passwd", "../escape.png", "a/../../b.png", "", "./"] {
            let result = GoldenId::from(id).resolve_under(base);
            assert!(
                matches!(result, Err(ComparatorError::InvalidGoldenId { .. })),
                "expected {id:?} to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn backslash_follows_platform_rules() {
        let base = Path::new("goldens");
        let path = GoldenId::from("dir\\name.png").resolve_under(base).unwrap();
        assert_eq!(path, base.join("dir\\name.png"));
        if cfg!(windows) {
            assert_eq!(path, base.join("dir").join("name.png"));
        } else {
            assert_eq!(path.file_name().unwrap(), "dir\\name.png");
        }
    }

    #[test]
    fn tolerance_bounds() {
        assert!(Tolerance::new(0.0).unwrap().is_exact());
        assert_eq!(Tolerance::new(1.0).unwrap().value(), 1.0);
        assert!(Tolerance::new(-0.01).is_err());
        assert!(Tolerance::new(1.5).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
    }

    #[test]
    fn tolerance_deserialization_is_validated() {
        let ok: Tolerance = serde_json::from_str("0.25").unwrap();
        assert_eq!(ok.value(), 0.25);
        assert!(serde_json::from_str::<Tolerance>("3.0").is_err());
    }
}
