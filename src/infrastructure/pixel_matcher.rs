//! Pixel-level image matching backed by the `image` crate

use crate::domain::services::ImageMatcher;
use crate::domain::value_objects::Tolerance;
use image::{Rgba, RgbaImage};

/// Summary of a pixel-by-pixel comparison of two equally sized images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDiff {
    pub width: u32,
    pub height: u32,
    pub differing_pixels: u64,
    pub total_pixels: u64,
}

impl ImageDiff {
    /// Fraction of pixels that differ, in `[0, 1]`
    pub fn diff_ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.differing_pixels as f64 / self.total_pixels as f64
        }
    }

    pub fn is_identical(&self) -> bool {
        self.differing_pixels == 0
    }

    pub fn within(&self, tolerance: Tolerance) -> bool {
        self.diff_ratio() <= tolerance.value()
    }
}

/// Default matcher: decodes both images and counts differing pixels.
///
/// A pixel differs when any RGBA channel differs. Images match when the ratio of
/// differing pixels does not exceed the tolerance. Undecodable input and
/// dimension mismatches never match.
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelMatcher;

impl PixelMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Decode and diff two encoded images.
    ///
    /// Returns `None` when either side fails to decode or the dimensions differ.
    pub fn diff(&self, candidate: &[u8], golden: &[u8]) -> Option<ImageDiff> {
        let (candidate, golden) = decode_pair(candidate, golden)?;
        diff_rgba(&candidate, &golden)
    }

    /// Image with differing pixels painted opaque red on a transparent background
    pub fn isolated_diff(&self, candidate: &[u8], golden: &[u8]) -> Option<RgbaImage> {
        let (candidate, golden) = decode_pair(candidate, golden)?;
        if candidate.dimensions() != golden.dimensions() {
            return None;
        }

        let (width, height) = candidate.dimensions();
        let mut out = RgbaImage::new(width, height);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            if candidate.get_pixel(x, y) != golden.get_pixel(x, y) {
                *pixel = Rgba([255, 0, 0, 255]);
            }
        }
        Some(out)
    }
}

impl ImageMatcher for PixelMatcher {
    fn matches(&self, candidate: &[u8], golden: &[u8], tolerance: Tolerance) -> bool {
        if candidate == golden {
            return true;
        }

        match self.diff(candidate, golden) {
            Some(diff) => {
                log::debug!(
                    "{} of {} pixels differ ({:.4}%), tolerance {}",
                    diff.differing_pixels,
                    diff.total_pixels,
                    diff.diff_ratio() * 100.0,
                    tolerance
                );
                diff.within(tolerance)
            }
            None => false,
        }
    }
}

fn decode_pair(candidate: &[u8], golden: &[u8]) -> Option<(RgbaImage, RgbaImage)> {
    let candidate = decode(candidate, "candidate")?;
    let golden = decode(golden, "golden")?;
    Some((candidate, golden))
}

fn decode(bytes: &[u8], label: &str) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            log::debug!("Failed to decode {label} image ({} bytes): {e}", bytes.len());
            None
        }
    }
}

fn diff_rgba(candidate: &RgbaImage, golden: &RgbaImage) -> Option<ImageDiff> {
    if candidate.dimensions() != golden.dimensions() {
        log::debug!(
            "Dimension mismatch: candidate {:?}, golden {:?}",
            candidate.dimensions(),
            golden.dimensions()
        );
        return None;
    }

    let (width, height) = candidate.dimensions();
    let differing_pixels = candidate
        .pixels()
        .zip(golden.pixels())
        .filter(|(a, b)| a != b)
        .count() as u64;

    Some(ImageDiff {
        width,
        height,
        differing_pixels,
        total_pixels: u64::from(width) * u64::from(height),
    })
}
