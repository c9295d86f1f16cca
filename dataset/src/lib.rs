//! COCO `val2017` as a local, queryable dataset.
//!
//! [`Dataset::prepare`] makes sure the archives are downloaded and unpacked
//! into a cache directory and then indexes the instance annotations. The
//! resulting handle is read-only and cheap to share behind an `Arc`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod archive;
mod id;
mod index;
mod schema;

pub use archive::Layout;
pub use id::{CategoryId, ImageId};
pub use index::{Annotation, BBox, Category, ImageInfo, Index};

pub struct Dataset {
	layout: Layout,
	index: Index,
}

impl Dataset {
	/// Default cache location: `<cache_dir>/FindIt/coco`.
	pub fn default_dir() -> Option<PathBuf> {
		dirs::cache_dir().map(|p| p.join("FindIt").join("coco"))
	}

	/// Fetch (if needed) and index the dataset stored under `root`.
	pub fn prepare(root: impl Into<PathBuf>) -> Result<Self> {
		let layout = Layout::new(root);
		archive::ensure_available(&layout)
			.with_context(|| format!("Make dataset available in {}", layout.root().display()))?;
		Self::open_layout(layout)
	}

	/// Index a dataset that is already unpacked under `root`. Never touches the network.
	pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
		Self::open_layout(Layout::new(root))
	}

	fn open_layout(layout: Layout) -> Result<Self> {
		let index = Index::load(layout.annotation_file())?;
		log::info!(
			"Indexed {} categories, {} images, {} annotations from {}",
			index.categories().len(),
			index.image_count(),
			index.annotation_count(),
			layout.root().display()
		);
		Ok(Self { layout, index })
	}

	pub fn root(&self) -> &Path {
		self.layout.root()
	}

	pub fn index(&self) -> &Index {
		&self.index
	}

	/// Path of the photo file for `image`.
	pub fn image_path(&self, image: &ImageInfo) -> PathBuf {
		self.layout.images_dir().join(&image.file_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn open_indexes_an_unpacked_dataset() {
		let dir = tempfile::tempdir().unwrap();
		let layout = Layout::new(dir.path());
		std::fs::create_dir_all(layout.annotation_file().parent().unwrap()).unwrap();
		std::fs::write(layout.annotation_file(), index::tests::FIXTURE).unwrap();
		std::fs::create_dir_all(layout.images_dir()).unwrap();

		let dataset = Dataset::prepare(dir.path()).unwrap();
		assert_eq!(dataset.index().categories().len(), 3);

		let image = dataset.index().image(ImageId(7)).unwrap();
		assert_eq!(dataset.image_path(image), dir.path().join("val2017").join("000000000007.jpg"));
	}

	#[test]
	fn open_without_annotations_fails() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Dataset::open(dir.path()).is_err());
	}
}
