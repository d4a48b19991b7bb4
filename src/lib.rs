//! # golden_comparator
//!
//! Golden-image file comparison for screenshot tests. Golden identifiers are
//! resolved against a base directory; candidate bytes are compared against the
//! stored golden through a pluggable [`ImageMatcher`], and goldens can be
//! created or overwritten on demand.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use golden_comparator::{GoldenFileComparator, GoldenId, LocalGoldenComparator, Tolerance};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let comparator = LocalGoldenComparator::new("tests/goldens", Tolerance::EXACT);
//! let id = GoldenId::from("widgets/button.png");
//! let screenshot: Vec<u8> = std::fs::read("target/button.png")?;
//!
//! match comparator.compare(&screenshot, &id).await {
//!     Ok(true) => println!("matches"),
//!     Ok(false) => println!("pixels differ"),
//!     Err(e) if e.is_missing_golden() => comparator.update(&id, &screenshot).await?,
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Compare-or-update in tests
//!
//! ```rust,no_run
//! use golden_comparator::{ComparatorConfig, GoldenVerdict};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // UPDATE_GOLDENS=1 rewrites goldens instead of comparing
//! let tester = ComparatorConfig::from_env("tests/goldens")?.build_tester();
//! let verdict = tester.assert_matches("login/form.png", b"...png bytes...").await?;
//! assert_ne!(verdict, GoldenVerdict::Mismatched);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{GoldenTester, GoldenVerdict};
pub use config::ComparatorConfig;
pub use domain::{
    BaseDirProvider, ComparatorError, ExactBytesMatcher, GoldenFileComparator, GoldenId,
    ImageMatcher, MISSING_GOLDEN_MESSAGE, Tolerance,
};
pub use infrastructure::{FailureArtifactWriter, ImageDiff, LocalGoldenComparator, PixelMatcher};
