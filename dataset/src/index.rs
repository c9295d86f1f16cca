//! In-memory annotation index.
//!
//! Built once from the instances JSON and then only queried: categories,
//! images that contain a category, and the annotations of one image.

use std::{
	collections::HashMap,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

use anyhow::{Context, Result};

use crate::{schema::instances::Instances, CategoryId, ImageId};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
	pub id: ImageId,
	pub file_name: String,
	pub width: u32,
	pub height: u32,
}

/// Axis-aligned box in original image pixels, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
	pub id: u64,
	pub image: ImageId,
	pub category: CategoryId,
	pub bbox: BBox,
	/// Crowd regions cover a group of objects with a single box.
	pub crowd: bool,
}

#[derive(Debug, Default)]
pub struct Index {
	categories: Vec<Category>,
	images: HashMap<ImageId, ImageInfo>,
	annotations: Vec<Annotation>,
	by_image: HashMap<ImageId, Vec<usize>>,
	by_category: HashMap<CategoryId, Vec<ImageId>>,
}

impl Index {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).with_context(|| format!("Open annotations {}", path.display()))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("Parse annotations {}", path.display()))
	}

	pub fn from_reader(reader: impl Read) -> Result<Self> {
		let instances: Instances = serde_json::from_reader(reader).context("Decode instances JSON")?;
		Ok(Self::from_instances(instances))
	}

	pub fn from_instances(instances: Instances) -> Self {
		let mut categories = instances
			.categories
			.into_iter()
			.map(|c| Category {
				id: CategoryId(c.id),
				name: c.name,
			})
			.collect::<Vec<_>>();
		categories.sort_by_key(|c| c.id);

		let images = instances
			.images
			.into_iter()
			.map(|i| {
				let id = ImageId(i.id);
				(id, ImageInfo { id, file_name: i.file_name, width: i.width, height: i.height })
			})
			.collect::<HashMap<_, _>>();

		let mut annotations = Vec::with_capacity(instances.annotations.len());
		let mut by_image: HashMap<ImageId, Vec<usize>> = HashMap::new();
		let mut by_category: HashMap<CategoryId, Vec<ImageId>> = HashMap::new();
		for a in instances.annotations {
			let image = ImageId(a.image_id);
			let category = CategoryId(a.category_id);
			if !images.contains_key(&image) {
				log::debug!("annotation {} points at unknown {image}; skipped", a.id);
				continue;
			}

			by_image.entry(image).or_default().push(annotations.len());
			by_category.entry(category).or_default().push(image);
			let [x, y, width, height] = a.bbox;
			annotations.push(Annotation {
				id: a.id,
				image,
				category,
				bbox: BBox { x, y, width, height },
				crowd: a.iscrowd != 0,
			});
		}

		for ids in by_category.values_mut() {
			ids.sort_unstable();
			ids.dedup();
		}

		Self { categories, images, annotations, by_image, by_category }
	}

	/// All categories, ordered by id.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Case-insensitive lookup by display name ("dog", "traffic light").
	pub fn category_by_name(&self, name: &str) -> Option<&Category> {
		let name = name.trim();
		self.categories.iter().find(|c| c.name.eq_ignore_ascii_case(name))
	}

	/// Ids of the images that have at least one annotation of `category`, ascending.
	pub fn image_ids(&self, category: CategoryId) -> &[ImageId] {
		self.by_category.get(&category).map_or(&[][..], Vec::as_slice)
	}

	pub fn image(&self, id: ImageId) -> Option<&ImageInfo> {
		self.images.get(&id)
	}

	/// Annotations of one image, optionally restricted to a category and/or crowd flag.
	pub fn annotations(
		&self,
		image: ImageId,
		category: Option<CategoryId>,
		crowd: Option<bool>,
	) -> impl Iterator<Item = &Annotation> + '_ {
		self.by_image
			.get(&image)
			.map_or(&[][..], Vec::as_slice)
			.iter()
			.map(|&i| &self.annotations[i])
			.filter(move |a| category.is_none_or(|c| a.category == c))
			.filter(move |a| crowd.is_none_or(|c| a.crowd == c))
	}

	pub fn image_count(&self) -> usize {
		self.images.len()
	}

	pub fn annotation_count(&self) -> usize {
		self.annotations.len()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) const FIXTURE: &str = r#"{
		"info": {"description": "fixture"},
		"images": [
			{"id": 7, "file_name": "000000000007.jpg", "width": 640, "height": 480, "license": 1},
			{"id": 9, "file_name": "000000000009.jpg", "width": 500, "height": 375}
		],
		"annotations": [
			{"id": 1, "image_id": 7, "category_id": 18, "bbox": [10.5, 20.0, 100.2, 90.9], "iscrowd": 0, "area": 1.0, "segmentation": [[1, 2, 3, 4]]},
			{"id": 2, "image_id": 7, "category_id": 18, "bbox": [300.0, 200.0, 40.0, 30.0], "iscrowd": 1, "segmentation": {"counts": [1], "size": [480, 640]}},
			{"id": 3, "image_id": 7, "category_id": 1, "bbox": [0.0, 0.0, 5.0, 5.0], "iscrowd": 0},
			{"id": 4, "image_id": 9, "category_id": 1, "bbox": [1.0, 1.0, 200.0, 200.0], "iscrowd": 0},
			{"id": 5, "image_id": 404, "category_id": 1, "bbox": [1.0, 1.0, 2.0, 2.0], "iscrowd": 0}
		],
		"categories": [
			{"id": 18, "name": "dog", "supercategory": "animal"},
			{"id": 1, "name": "person", "supercategory": "person"},
			{"id": 2, "name": "bicycle", "supercategory": "vehicle"}
		]
	}"#;

	fn index() -> Index {
		Index::from_reader(FIXTURE.as_bytes()).unwrap()
	}

	#[test]
	fn categories_are_sorted_and_named() {
		let index = index();
		let names = index.categories().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
		assert_eq!(names, ["person", "bicycle", "dog"]);
		assert_eq!(index.category_by_name("Dog").map(|c| c.id), Some(CategoryId(18)));
		assert!(index.category_by_name("cat").is_none());
	}

	#[test]
	fn image_ids_follow_annotations() {
		let index = index();
		assert_eq!(index.image_ids(CategoryId(1)), &[ImageId(7), ImageId(9)]);
		assert_eq!(index.image_ids(CategoryId(18)), &[ImageId(7)]);
		assert!(index.image_ids(CategoryId(2)).is_empty());
		assert_eq!(index.image(ImageId(9)).map(|i| i.width), Some(500));
	}

	#[test]
	fn annotations_filter_by_category_and_crowd() {
		let index = index();
		let dogs = index.annotations(ImageId(7), Some(CategoryId(18)), None).collect::<Vec<_>>();
		assert_eq!(dogs.len(), 2);
		assert_eq!(dogs[0].bbox, BBox { x: 10.5, y: 20.0, width: 100.2, height: 90.9 });
		assert!(dogs[1].crowd);

		let solo = index.annotations(ImageId(7), Some(CategoryId(18)), Some(false)).count();
		assert_eq!(solo, 1);
		assert_eq!(index.annotations(ImageId(7), None, None).count(), 3);
		assert_eq!(index.annotations(ImageId(12345), None, None).count(), 0);
	}

	#[test]
	fn dangling_annotations_are_dropped() {
		let index = index();
		assert_eq!(index.annotation_count(), 4);
		assert_eq!(index.image_count(), 2);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(Index::from_reader(&b"{\"images\": 3}"[..]).is_err());
	}
}
