//! Overlay drawing on top of a photo.
//!
//! Coordinates are `f32` display pixels and are rounded to the pixel grid.
//! Anything falling outside the image is clipped by `imageproc`.

use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::{Color, OwnedImage};

/// Mutable drawing surface seeded from a base image.
pub struct Canvas {
	image: image::RgbImage,
}

impl Canvas {
	pub fn new(base: &OwnedImage) -> Self {
		Self { image: base.to_rgb_image() }
	}

	/// Rectangle outline between two corners, growing inwards by `thickness` pixels.
	pub fn outline_rect(&mut self, top_left: (f32, f32), bottom_right: (f32, f32), color: Color, thickness: u32) {
		let x1 = top_left.0.round() as i32;
		let y1 = top_left.1.round() as i32;
		let x2 = bottom_right.0.round() as i32;
		let y2 = bottom_right.1.round() as i32;

		for i in 0..thickness as i32 {
			let w = x2 - x1 + 1 - 2 * i;
			let h = y2 - y1 + 1 - 2 * i;
			// `Rect::of_size` panics on zero-sized rects.
			if w <= 0 || h <= 0 {
				break;
			}
			let rect = Rect::at(x1 + i, y1 + i).of_size(w as u32, h as u32);
			draw_hollow_rect_mut(&mut self.image, rect, color.into());
		}
	}

	/// Diagonal cross ("X") centered on `center`, each arm reaching `half_size` pixels.
	pub fn cross(&mut self, center: (f32, f32), half_size: f32, color: Color, width: u32) {
		let (cx, cy) = center;
		let spread = (width.max(1) - 1) as f32 / 2.0;

		for i in 0..width.max(1) {
			let dx = i as f32 - spread;
			draw_line_segment_mut(
				&mut self.image,
				(cx - half_size + dx, cy - half_size),
				(cx + half_size + dx, cy + half_size),
				color.into(),
			);
			draw_line_segment_mut(
				&mut self.image,
				(cx - half_size + dx, cy + half_size),
				(cx + half_size + dx, cy - half_size),
				color.into(),
			);
		}
	}

	pub fn finish(self) -> OwnedImage {
		OwnedImage::from_rgb_image(&self.image)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn outline_colors_border_band_only() {
		let base = OwnedImage::filled(50, 50, Color::WHITE);
		let mut canvas = Canvas::new(&base);
		canvas.outline_rect((10.0, 10.0), (40.0, 40.0), Color::GREEN, 3);
		let img = canvas.finish();

		assert_eq!(img.pixel(10, 25), Some(Color::GREEN));
		assert_eq!(img.pixel(12, 25), Some(Color::GREEN));
		assert_eq!(img.pixel(40, 40), Some(Color::GREEN));
		assert_eq!(img.pixel(13, 25), Some(Color::WHITE));
		assert_eq!(img.pixel(25, 25), Some(Color::WHITE));
		assert_eq!(img.pixel(9, 25), Some(Color::WHITE));
	}

	#[test]
	fn outline_partially_off_image_is_clipped() {
		let base = OwnedImage::filled(20, 20, Color::WHITE);
		let mut canvas = Canvas::new(&base);
		canvas.outline_rect((-5.0, -5.0), (30.0, 10.0), Color::RED, 2);
		let img = canvas.finish();

		assert_eq!(img.pixel(5, 10), Some(Color::RED));
		assert_eq!(img.pixel(5, 5), Some(Color::WHITE));
	}

	#[test]
	fn degenerate_outline_does_not_panic() {
		let base = OwnedImage::filled(10, 10, Color::WHITE);
		let mut canvas = Canvas::new(&base);
		canvas.outline_rect((5.0, 5.0), (5.0, 5.0), Color::RED, 3);
		assert_eq!(canvas.finish().pixel(5, 5), Some(Color::RED));
	}

	#[test]
	fn cross_marks_center_and_arm_tips() {
		let base = OwnedImage::filled(30, 30, Color::WHITE);
		let mut canvas = Canvas::new(&base);
		canvas.cross((15.0, 15.0), 5.0, Color::RED, 2);
		let img = canvas.finish();

		assert!(red_near(&img, 15, 15));
		assert!(red_near(&img, 10, 10));
		assert!(red_near(&img, 20, 10));
		assert!(red_near(&img, 10, 20));
		assert_eq!(img.pixel(15, 5), Some(Color::WHITE));
		assert_eq!(img.pixel(25, 15), Some(Color::WHITE));
	}

	fn red_near(img: &OwnedImage, x: u32, y: u32) -> bool {
		(x - 1..=x + 1).any(|x| (y - 1..=y + 1).any(|y| img.pixel(x, y) == Some(Color::RED)))
	}
}
