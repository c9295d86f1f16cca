//! State of the round currently on screen: targets, hits, misses.

use std::collections::BTreeSet;
use std::time::Instant;

use dataset::BBox;
use imaging::OwnedImage;

/// Boxes narrower or shorter than this (original pixels) are too small to click.
pub const MIN_TARGET_SIDE: i32 = 80;
/// Boxes below this side length count as "small" clutter.
pub const SMALL_INSTANCE_SIDE: i32 = 80;
/// A multi-target photo with more small instances than this is rejected.
pub const MAX_SMALL_INSTANCES: usize = 3;

/// Target rectangle in original image pixels, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
	pub x1: i32,
	pub y1: i32,
	pub x2: i32,
	pub y2: i32,
}

impl Region {
	/// `(x, y, w, h)` truncated to whole pixels.
	pub fn from_bbox(bbox: &BBox) -> Self {
		let (x, y) = (bbox.x as i32, bbox.y as i32);
		Self {
			x1: x,
			y1: y,
			x2: x + bbox.width as i32,
			y2: y + bbox.height as i32,
		}
	}

	pub fn contains(&self, x: f32, y: f32) -> bool {
		self.x1 as f32 <= x && x <= self.x2 as f32 && self.y1 as f32 <= y && y <= self.y2 as f32
	}
}

/// Pick the clickable targets out of one photo's boxes for a category.
///
/// Returns `None` when the photo does not suit a level allowing `max_targets`:
/// nothing large enough, too many large targets, or several targets lost in
/// a crowd of small ones.
pub fn qualify(boxes: &[BBox], max_targets: usize) -> Option<Vec<Region>> {
	let mut targets = Vec::new();
	let mut small = 0;
	for bbox in boxes {
		let (w, h) = (bbox.width as i32, bbox.height as i32);
		if w < SMALL_INSTANCE_SIDE || h < SMALL_INSTANCE_SIDE {
			small += 1;
		}
		if w >= MIN_TARGET_SIDE && h >= MIN_TARGET_SIDE {
			targets.push(Region::from_bbox(bbox));
		}
	}

	if targets.len() > 1 && small > MAX_SMALL_INSTANCES {
		return None;
	}
	if targets.is_empty() || targets.len() > max_targets {
		return None;
	}
	Some(targets)
}

/// Outcome of testing one click against the targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
	/// Inside a target that had not been found yet.
	Found(usize),
	/// Only inside targets that were already found.
	AlreadyFound(usize),
	/// Outside every target; carries the click in original pixels.
	Miss { x: f32, y: f32 },
}

#[derive(Debug, Clone)]
pub struct Round {
	/// Lowercase category name, as shown in the headline.
	pub category: String,
	/// Word spoken by the narrator.
	pub word: String,
	/// Photo already resized to the display size.
	pub photo: OwnedImage,
	/// Display size divided by original size, per axis.
	pub scale: (f32, f32),
	pub started_at: Instant,
	targets: Vec<Region>,
	found: BTreeSet<usize>,
	misses: Vec<(f32, f32)>,
}

impl Round {
	pub fn new(
		category: String,
		word: String,
		targets: Vec<Region>,
		photo: OwnedImage,
		original_size: (u32, u32),
		started_at: Instant,
	) -> Self {
		let scale = (
			photo.width() as f32 / original_size.0.max(1) as f32,
			photo.height() as f32 / original_size.1.max(1) as f32,
		);
		Self {
			category,
			word,
			photo,
			scale,
			started_at,
			targets,
			found: BTreeSet::new(),
			misses: Vec::new(),
		}
	}

	pub fn targets(&self) -> &[Region] {
		&self.targets
	}

	pub fn total(&self) -> usize {
		self.targets.len()
	}

	pub fn found_count(&self) -> usize {
		self.found.len()
	}

	pub fn remaining(&self) -> usize {
		self.total() - self.found_count()
	}

	pub fn is_found(&self, index: usize) -> bool {
		self.found.contains(&index)
	}

	pub fn is_complete(&self) -> bool {
		self.found_count() == self.total()
	}

	/// Incorrect clicks so far, in original pixels.
	pub fn misses(&self) -> &[(f32, f32)] {
		&self.misses
	}

	pub fn to_original(&self, display: (f32, f32)) -> (f32, f32) {
		(display.0 / self.scale.0, display.1 / self.scale.1)
	}

	pub fn to_display(&self, original: (f32, f32)) -> (f32, f32) {
		(original.0 * self.scale.0, original.1 * self.scale.1)
	}

	/// Test a click given in display pixels. The first unfound target containing it wins.
	pub fn hit_test(&self, display: (f32, f32)) -> Hit {
		let (x, y) = self.to_original(display);
		let mut already = None;
		for (i, target) in self.targets.iter().enumerate() {
			if !target.contains(x, y) {
				continue;
			}
			if !self.is_found(i) {
				return Hit::Found(i);
			}
			already.get_or_insert(i);
		}
		match already {
			Some(i) => Hit::AlreadyFound(i),
			None => Hit::Miss { x, y },
		}
	}

	/// Returns `false` if `index` is out of range or already found.
	pub fn mark_found(&mut self, index: usize) -> bool {
		index < self.targets.len() && self.found.insert(index)
	}

	pub fn record_miss(&mut self, original: (f32, f32)) {
		self.misses.push(original);
	}
}
