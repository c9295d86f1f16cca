//! On-disk / over-the-wire formats owned by upstream (COCO).

pub mod instances;

/// Annotation bundle (train + val instance/caption/keypoint files).
pub const ANNOTATIONS_URL: &str = "http://images.cocodataset.org/annotations/annotations_trainval2017.zip";
/// Validation split photos (5k JPEGs).
pub const VAL_IMAGES_URL: &str = "http://images.cocodataset.org/zips/val2017.zip";
