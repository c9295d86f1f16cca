use serde::Deserialize;

/// Subset of the COCO "instances" annotation file that the game reads.
///
/// Segmentation polygons/RLE and the license/info blocks are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct Instances {
	pub images: Vec<Image>,
	pub annotations: Vec<Annotation>,
	pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
	pub id: u64,
	pub file_name: String,
	pub width: u32,
	pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
	pub id: u64,
	pub image_id: u64,
	pub category_id: u32,
	/// `[x, y, width, height]` in image pixels, top-left origin.
	pub bbox: [f64; 4],
	#[serde(default)]
	pub iscrowd: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
	pub id: u32,
	pub name: String,
}
