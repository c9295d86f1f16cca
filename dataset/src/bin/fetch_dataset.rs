//! Pre-download the COCO archives so the game starts without waiting.
//!
//! Usage: `fetch_dataset [DIR]` (defaults to the game's cache directory).

use std::path::PathBuf;

use anyhow::{Context, Result};

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let dir = match std::env::args_os().nth(1) {
		Some(dir) => PathBuf::from(dir),
		None => dataset::Dataset::default_dir().context("No cache_dir available; pass a directory")?,
	};

	let dataset = dataset::Dataset::prepare(&dir)?;
	println!(
		"Dataset ready in {} ({} categories, {} images)",
		dataset.root().display(),
		dataset.index().categories().len(),
		dataset.index().image_count()
	);
	Ok(())
}
