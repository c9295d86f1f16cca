//! Dataset acquisition: download the COCO zips into a cache directory and unpack them.
//!
//! Everything here is blocking and can take minutes on a cold cache (the
//! photo archive is ~800 MB), so callers run it off the UI thread.

use std::{
	fs::File,
	io::{BufReader, BufWriter, Write},
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::schema;

/// Where things live inside a dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
	root: PathBuf,
}

impl Layout {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn annotation_file(&self) -> PathBuf {
		self.root.join("annotations").join("instances_val2017.json")
	}

	pub fn images_dir(&self) -> PathBuf {
		self.root.join("val2017")
	}

	fn annotations_zip(&self) -> PathBuf {
		self.root.join("annotations.zip")
	}

	fn images_zip(&self) -> PathBuf {
		self.root.join("val2017.zip")
	}

	/// Both the annotation file and the photo directory are present.
	pub fn is_complete(&self) -> bool {
		self.annotation_file().is_file() && self.images_dir().is_dir()
	}
}

/// Make sure the annotation file and photos exist under `layout`, fetching what is missing.
///
/// Zips that were already downloaded are reused. A photo archive that fails to
/// unpack (usually a truncated download) is deleted and fetched once more.
pub fn ensure_available(layout: &Layout) -> Result<()> {
	if layout.is_complete() {
		return Ok(());
	}
	std::fs::create_dir_all(layout.root())
		.with_context(|| format!("Create dataset dir {}", layout.root().display()))?;

	let annotations_zip = layout.annotations_zip();
	if !annotations_zip.exists() {
		download(schema::ANNOTATIONS_URL, &annotations_zip)?;
	}
	extract(&annotations_zip, layout.root())?;

	let images_zip = layout.images_zip();
	if !images_zip.exists() {
		download(schema::VAL_IMAGES_URL, &images_zip)?;
	}
	if let Err(err) = extract(&images_zip, layout.root()) {
		log::warn!("Photo archive unusable, downloading again: {err:#}");
		std::fs::remove_file(&images_zip).with_context(|| format!("Remove {}", images_zip.display()))?;
		download(schema::VAL_IMAGES_URL, &images_zip)?;
		extract(&images_zip, layout.root())?;
	}

	Ok(())
}

/// Stream `url` into `target`.
///
/// The body lands in `<target>.part` first and is renamed on success, so an
/// interrupted transfer never looks like a finished zip.
pub fn download(url: &str, target: &Path) -> Result<()> {
	if let Some(parent) = target.parent() {
		std::fs::create_dir_all(parent).with_context(|| format!("Create dir {}", parent.display()))?;
	}

	log::info!("Downloading {url} -> {}", target.display());
	let res = ureq::get(url).call().with_context(|| format!("GET {url}"))?;
	let mut reader = res.into_body().into_reader();

	let part = part_path(target);
	let file = File::create(&part).with_context(|| format!("Create {}", part.display()))?;
	let mut writer = BufWriter::new(file);
	let bytes = std::io::copy(&mut reader, &mut writer).with_context(|| format!("Read body of {url}"))?;
	writer.flush().with_context(|| format!("Flush {}", part.display()))?;
	drop(writer);

	std::fs::rename(&part, target).with_context(|| format!("Persist {}", target.display()))?;
	log::info!("Downloaded {bytes} bytes from {url}");
	Ok(())
}

/// Unpack every entry of `zip_path` below `dir`.
pub fn extract(zip_path: &Path, dir: &Path) -> Result<()> {
	let file = File::open(zip_path).with_context(|| format!("Open {}", zip_path.display()))?;
	let mut archive = zip::ZipArchive::new(BufReader::new(file))
		.with_context(|| format!("Read zip directory of {}", zip_path.display()))?;
	log::info!("Extracting {} entries from {}", archive.len(), zip_path.display());
	archive
		.extract(dir)
		.with_context(|| format!("Extract {} into {}", zip_path.display(), dir.display()))?;
	Ok(())
}

fn part_path(target: &Path) -> PathBuf {
	let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".part");
	target.with_file_name(name)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
		let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
		for (name, body) in entries {
			zip.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
			zip.write_all(body).unwrap();
		}
		zip.finish().unwrap();
	}

	#[test]
	fn complete_layout_needs_no_network() {
		let dir = tempfile::tempdir().unwrap();
		let layout = Layout::new(dir.path());
		assert!(!layout.is_complete());

		std::fs::create_dir_all(layout.annotation_file().parent().unwrap()).unwrap();
		std::fs::write(layout.annotation_file(), b"{}").unwrap();
		std::fs::create_dir_all(layout.images_dir()).unwrap();
		assert!(layout.is_complete());
		ensure_available(&layout).unwrap();
	}

	#[test]
	fn extract_unpacks_nested_entries() {
		let dir = tempfile::tempdir().unwrap();
		let zip_path = dir.path().join("annotations.zip");
		write_zip(
			&zip_path,
			&[
				("annotations/instances_val2017.json", br#"{"images":[],"annotations":[],"categories":[]}"#),
				("val2017/000000000001.jpg", b"not really a jpeg"),
			],
		);

		extract(&zip_path, dir.path()).unwrap();
		let layout = Layout::new(dir.path());
		assert!(layout.is_complete());
		assert_eq!(std::fs::read(layout.images_dir().join("000000000001.jpg")).unwrap(), b"not really a jpeg");
	}

	#[test]
	fn extract_rejects_garbage() {
		let dir = tempfile::tempdir().unwrap();
		let zip_path = dir.path().join("val2017.zip");
		std::fs::write(&zip_path, b"truncated download").unwrap();
		assert!(extract(&zip_path, dir.path()).is_err());
	}

	#[test]
	fn part_file_sits_next_to_target() {
		assert_eq!(part_path(Path::new("/cache/coco/val2017.zip")), PathBuf::from("/cache/coco/val2017.zip.part"));
	}
}
