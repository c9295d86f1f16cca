use imaging::{Canvas, Color, OwnedImage};

use super::Round;

const BOX_THICKNESS: u32 = 3;
const CROSS_HALF_SIZE: f32 = 5.0;
const CROSS_WIDTH: u32 = 2;

/// Draw the round's annotations over its photo.
///
/// Found targets get a green outline. With `revealed`, targets that were never
/// found are outlined in red too. Every miss is marked with a red cross.
pub fn render(round: &Round, revealed: bool) -> OwnedImage {
	let mut canvas = Canvas::new(&round.photo);

	for (i, target) in round.targets().iter().enumerate() {
		let color = match (round.is_found(i), revealed) {
			(true, _) => Color::GREEN,
			(false, true) => Color::RED,
			(false, false) => continue,
		};
		canvas.outline_rect(
			round.to_display((target.x1 as f32, target.y1 as f32)),
			round.to_display((target.x2 as f32, target.y2 as f32)),
			color,
			BOX_THICKNESS,
		);
	}

	for &miss in round.misses() {
		canvas.cross(round.to_display(miss), CROSS_HALF_SIZE, Color::RED, CROSS_WIDTH);
	}

	canvas.finish()
}
