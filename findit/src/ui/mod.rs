use std::sync::Arc;

use egui::RichText;

mod ext;
pub use ext::UiExt;

mod game;
mod level;
mod settings;

use crate::game::{Catalog, Level};
use crate::loader::{DatasetLoader, LoadStatus};
use crate::narration::Narrator;
use crate::tr;
use game::{GameAction, GameView};

pub struct FindIt {
	tab: Tab,
	screen: Screen,
	loader: DatasetLoader,
	narrator: Narrator,
}

enum Screen {
	LevelSelect,
	/// `game` is created once the dataset is ready.
	Playing { level: Level, game: Option<GameView> },
}

impl FindIt {
	pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
		let config = crate::config();

		// Apply UI zoom (in addition to OS DPI scaling).
		cc.egui_ctx.set_zoom_factor(config.ui_zoom_factor);

		let ctx = cc.egui_ctx.clone();
		let loader = DatasetLoader::spawn(config.dataset_dir(), move || ctx.request_repaint());
		let narrator = Narrator::from_config(&config);
		drop(config);

		Self {
			tab: Tab::Play,
			screen: Screen::LevelSelect,
			loader,
			narrator,
		}
	}

	fn ui_play(&mut self, ui: &mut egui::Ui) {
		let dataset = match self.loader.poll() {
			LoadStatus::Ready(dataset) => Some(dataset.clone()),
			LoadStatus::Loading => None,
			LoadStatus::Failed(err) => {
				let err = err.clone();
				ui.vertical_centered(|ui| {
					ui.add_space(60.0);
					ui.label(RichText::new(tr!("dataset-failed", error = err)).color(egui::Color32::RED));
				});
				return;
			}
		};

		if matches!(self.screen, Screen::LevelSelect) {
			if let Some(level) = level::ui(ui) {
				tracing::info!(level = level.number(), "level chosen");
				self.screen = Screen::Playing { level, game: None };
			}
			return;
		}

		let Screen::Playing { level, game } = &mut self.screen else { return };
		if game.is_none() {
			let Some(dataset) = dataset else {
				ui.vertical_centered(|ui| {
					ui.add_space(60.0);
					ui.spinner();
					ui.label(tr!("dataset-loading"));
				});
				return;
			};
			let catalog: Arc<dyn Catalog> = dataset;
			*game = Some(GameView::new(catalog, *level, crate::config().display_size()));
		}

		let action = game.as_mut().and_then(|game| game.ui(ui, &self.narrator));
		if action == Some(GameAction::ChangeLevel) {
			self.screen = Screen::LevelSelect;
		}
	}

	fn ui_settings(&mut self, ui: &mut egui::Ui) {
		if !settings::ui(ui) {
			return;
		}
		let config = crate::config();
		self.narrator.apply(&config);
		if let Screen::Playing { game: Some(game), .. } = &mut self.screen {
			game.set_display_size(config.display_size());
		}
	}
}

impl eframe::App for FindIt {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		// Apply zoom changes if user updated config while running.
		let zoom = crate::config().ui_zoom_factor;
		if (ctx.zoom_factor() - zoom).abs() > f32::EPSILON {
			ctx.set_zoom_factor(zoom);
		}

		egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
			ui.horizontal(|ui| {
				ui.selectable_value(&mut self.tab, Tab::Play, tr!("tab-play"));
				ui.selectable_value(&mut self.tab, Tab::Settings, tr!("tab-settings"));
			});
		});

		egui::CentralPanel::default().show(ctx, |ui| {
			egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
				Tab::Play => self.ui_play(ui),
				Tab::Settings => self.ui_settings(ui),
			});
		});
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
	Play,
	Settings,
}
