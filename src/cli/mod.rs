//! Command-line operations over a golden directory

use crate::domain::{GoldenFileComparator, GoldenId, Tolerance};
use crate::infrastructure::{LocalGoldenComparator, PixelMatcher};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Exit status of a CLI command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Mismatch,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::Mismatch => 1,
        }
    }
}

pub async fn run_compare(
    base_dir: &Path,
    id: &str,
    candidate_file: &Path,
    tolerance: Tolerance,
) -> anyhow::Result<CommandStatus> {
    let candidate = read_input(candidate_file).await?;
    let comparator = LocalGoldenComparator::new(base_dir, tolerance);
    let id = GoldenId::from(id);

    if comparator.compare(&candidate, &id).await? {
        println!("MATCH {id}");
        return Ok(CommandStatus::Success);
    }

    println!("MISMATCH {id}");
    let golden = comparator.golden_bytes(&id).await?;
    if let Some(diff) = PixelMatcher.diff(&candidate, &golden) {
        println!(
            "  {} of {} pixels differ ({:.4}%), tolerance {}",
            diff.differing_pixels,
            diff.total_pixels,
            diff.diff_ratio() * 100.0,
            tolerance
        );
    }
    Ok(CommandStatus::Mismatch)
}

pub async fn run_update(base_dir: &Path, id: &str, source_file: &Path) -> anyhow::Result<CommandStatus> {
    let bytes = read_input(source_file).await?;
    let comparator = LocalGoldenComparator::new(base_dir, Tolerance::EXACT);
    let id = GoldenId::from(id);

    comparator.update(&id, &bytes).await?;
    println!("UPDATED {} ({} bytes)", comparator.resolve(&id)?.display(), bytes.len());
    Ok(CommandStatus::Success)
}

pub async fn run_show(base_dir: &Path, id: &str) -> anyhow::Result<CommandStatus> {
    let comparator = LocalGoldenComparator::new(base_dir, Tolerance::EXACT);
    let id = GoldenId::from(id);
    let bytes = comparator.golden_bytes(&id).await?;

    println!("path:  {}", comparator.resolve(&id)?.display());
    println!("bytes: {}", bytes.len());
    match image::load_from_memory(&bytes) {
        Ok(img) => println!("size:  {}x{}", img.width(), img.height()),
        Err(_) => println!("size:  (not a decodable image)"),
    }
    Ok(CommandStatus::Success)
}

pub fn run_path(base_dir: &Path, id: &str) -> anyhow::Result<CommandStatus> {
    let comparator = LocalGoldenComparator::new(base_dir, Tolerance::EXACT);
    println!("{}", comparator.resolve(&GoldenId::from(id))?.display());
    Ok(CommandStatus::Success)
}

async fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file '{}'", path.display()))
}

/// Split `--tolerance <t>` out of the positional arguments.
pub fn parse_tolerance(args: &[String]) -> anyhow::Result<(Vec<PathBuf>, Tolerance)> {
    let mut positional = Vec::new();
    let mut tolerance = Tolerance::EXACT;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--tolerance" || arg == "-t" {
            let raw = iter.next().context("--tolerance requires a value")?;
            let value: f64 = raw
                .parse()
                .with_context(|| format!("Invalid tolerance '{raw}'"))?;
            tolerance = Tolerance::new(value)?;
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    Ok((positional, tolerance))
}
