//! Application layer - Use cases built on the domain traits

pub mod use_cases;

pub use use_cases::{GoldenTester, GoldenVerdict};
