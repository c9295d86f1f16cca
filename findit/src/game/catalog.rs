//! What the round controller needs from a dataset.

use anyhow::{Context, Result};
use dataset::{BBox, Dataset, ImageId};
use imaging::OwnedImage;

/// Read-only view of an annotated photo collection.
///
/// [`Dataset`] is the real implementation; tests plug in small in-memory ones.
pub trait Catalog: Send + Sync {
	/// Category names as listed by the dataset.
	fn category_names(&self) -> Vec<String>;

	/// Whether a category with this (case-insensitive) name exists.
	fn has_category(&self, name: &str) -> bool;

	/// Photos containing at least one instance of `category`.
	fn image_ids(&self, category: &str) -> Vec<ImageId>;

	/// Boxes of `category` in one photo, crowd regions included.
	fn boxes(&self, image: ImageId, category: &str) -> Vec<BBox>;

	/// Decode a photo at its original size.
	fn load_image(&self, image: ImageId) -> Result<OwnedImage>;
}

impl Catalog for Dataset {
	fn category_names(&self) -> Vec<String> {
		self.index().categories().iter().map(|c| c.name.clone()).collect()
	}

	fn has_category(&self, name: &str) -> bool {
		self.index().category_by_name(name).is_some()
	}

	fn image_ids(&self, category: &str) -> Vec<ImageId> {
		self.index()
			.category_by_name(category)
			.map(|c| self.index().image_ids(c.id).to_vec())
			.unwrap_or_default()
	}

	fn boxes(&self, image: ImageId, category: &str) -> Vec<BBox> {
		let Some(category) = self.index().category_by_name(category) else {
			return Vec::new();
		};
		self.index().annotations(image, Some(category.id), None).map(|a| a.bbox).collect()
	}

	fn load_image(&self, image: ImageId) -> Result<OwnedImage> {
		let info = self.index().image(image).with_context(|| format!("{image} is not indexed"))?;
		OwnedImage::open(self.image_path(info))
	}
}
