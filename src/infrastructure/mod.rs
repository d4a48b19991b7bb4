//! Infrastructure layer - File system and image decoding adapters

pub mod failure_artifacts;
pub mod pixel_matcher;
pub mod repositories;

pub use failure_artifacts::*;
pub use pixel_matcher::*;
pub use repositories::*;
