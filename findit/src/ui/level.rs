use egui::{Color32, RichText};

use crate::game::Level;
use crate::tr;

fn button_color(level: Level) -> Color32 {
	match level {
		Level::One => Color32::from_rgb(0x90, 0xEE, 0x90),
		Level::Two => Color32::from_rgb(0xFF, 0xD7, 0x00),
		Level::Three => Color32::from_rgb(0xFF, 0x99, 0x99),
	}
}

fn description(level: Level) -> String {
	match level {
		Level::One => tr!("level-1-description"),
		Level::Two => tr!("level-2-description"),
		Level::Three => tr!("level-3-description"),
	}
}

/// Difficulty picker. Returns the level the player clicked this frame.
pub fn ui(ui: &mut egui::Ui) -> Option<Level> {
	let mut chosen = None;

	ui.vertical_centered(|ui| {
		ui.add_space(40.0);
		ui.label(
			RichText::new(tr!("welcome-title"))
				.size(24.0)
				.strong()
				.color(Color32::from_rgb(0x1E, 0x90, 0xFF)),
		);
		ui.add_space(16.0);
		ui.label(RichText::new(tr!("choose-level")).size(18.0));
		ui.add_space(8.0);
		for level in Level::ALL {
			ui.label(RichText::new(description(level)).size(15.0));
		}

		ui.add_space(32.0);
		ui.horizontal(|ui| {
			// Centre the row of three buttons.
			let width = 3.0 * 110.0 + 2.0 * ui.spacing().item_spacing.x;
			ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
			for level in Level::ALL {
				let text = RichText::new(tr!("level-button", level = level.number()))
					.size(18.0)
					.strong()
					.color(Color32::BLACK);
				let button = egui::Button::new(text).fill(button_color(level)).min_size(egui::vec2(110.0, 48.0));
				if ui.add(button).clicked() {
					chosen = Some(level);
				}
			}
		});

		ui.add_space(24.0);
		ui.label(RichText::new(tr!("level-hint")).italics().weak());
	});

	chosen
}
