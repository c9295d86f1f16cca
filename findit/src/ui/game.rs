use std::sync::Arc;
use std::time::Instant;

use egui::{Color32, RichText};

use crate::game::{AnswersButton, Catalog, Feedback, GameState, Instruction, Level, Placeholder, RoundController};
use crate::narration::Narrator;
use crate::tr;

const HEADLINE: Color32 = Color32::from_rgb(0x1E, 0x90, 0xFF);
const SUCCESS: Color32 = Color32::from_rgb(0x00, 0x80, 0x00);
const FAILURE: Color32 = Color32::from_rgb(0xFF, 0x00, 0x00);
const LEARNING: Color32 = Color32::from_rgb(0x1E, 0x90, 0xFF);
const HIGHLIGHT: Color32 = Color32::from_rgb(0xFF, 0x63, 0x47);

/// What the game screen asks of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
	ChangeLevel,
}

/// Inputs collected while drawing, applied once the state borrow ends.
#[derive(Default)]
struct Input {
	click: Option<(f32, f32)>,
	new_word: bool,
	play_audio: bool,
	reveal: bool,
	change_level: bool,
}

pub struct GameView {
	controller: RoundController,
	/// Uploaded render of the round, tagged with the state revision it shows.
	texture: Option<(u64, egui::TextureHandle)>,
}

impl GameView {
	pub fn new(catalog: Arc<dyn Catalog>, level: Level, display: (u32, u32)) -> Self {
		let mut controller = RoundController::new(catalog, level, display);
		controller.start_round(Instant::now());
		Self { controller, texture: None }
	}

	pub fn set_display_size(&mut self, display: (u32, u32)) {
		self.controller.set_display_size(display);
	}

	pub fn ui(&mut self, ui: &mut egui::Ui, narrator: &Narrator) -> Option<GameAction> {
		let now = Instant::now();
		self.controller.tick(now);
		if let Some(wait) = self.controller.pending_advance(now) {
			ui.ctx().request_repaint_after(wait);
		}

		let texture = self.texture(ui.ctx());
		let state = self.controller.state();
		let mut input = Input::default();

		ui.vertical_centered(|ui| {
			ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
				ui.label(RichText::new(tr!("level-indicator", level = state.level.number())).italics().weak());
			});

			if let Some(round) = &state.round {
				ui.label(RichText::new(tr!("find-category", category = round.category.clone())).size(28.0).strong().color(HEADLINE));
			}
			let instruction = match state.instruction {
				Instruction::ClickObject => tr!("instruction-click"),
				Instruction::FindAll { count } => tr!("instruction-find-all", count = count),
			};
			ui.label(RichText::new(instruction).size(16.0));

			score_rows(ui, state);

			if let Some((text, color)) = state.feedback.as_ref().map(feedback) {
				ui.label(RichText::new(text).size(18.0).strong().color(color));
			}

			ui.add_space(8.0);
			match (&state.round, &texture, &state.placeholder) {
				(Some(round), Some(texture), _) => {
					let size = egui::vec2(round.photo.width() as f32, round.photo.height() as f32);
					let image = egui::Image::new(texture).fit_to_exact_size(size).sense(egui::Sense::click());
					let response = ui.add(image);
					if response.clicked() {
						input.click = response.interact_pointer_pos().map(|pos| {
							let local = pos - response.rect.min;
							(
								local.x * size.x / response.rect.width().max(1.0),
								local.y * size.y / response.rect.height().max(1.0),
							)
						});
					}
				}
				(_, _, Some(placeholder)) => {
					ui.add_space(40.0);
					ui.label(RichText::new(placeholder_text(placeholder)).size(16.0).weak());
					ui.add_space(40.0);
				}
				_ => {}
			}

			ui.add_space(16.0);
			ui.horizontal_wrapped(|ui| {
				input.new_word = ui.add(egui::Button::new(tr!("button-new-word")).fill(Color32::from_rgb(0xFF, 0xD7, 0x00))).clicked();
				input.play_audio = ui.add(egui::Button::new(tr!("button-play-audio")).fill(Color32::from_rgb(0x90, 0xEE, 0x90))).clicked();
				let answers_fill = match state.answers {
					AnswersButton::Hidden => None,
					AnswersButton::Visible => Some(Color32::from_rgb(0xFF, 0x99, 0x99)),
					AnswersButton::Highlighted => Some(HIGHLIGHT),
				};
				if let Some(fill) = answers_fill {
					input.reveal = ui.add(egui::Button::new(tr!("button-show-answers")).fill(fill)).clicked();
				}
				input.change_level = ui.add(egui::Button::new(tr!("button-change-level")).fill(Color32::from_gray(0xCC))).clicked();
			});
		});

		let now = Instant::now();
		if let Some(point) = input.click {
			let outcome = self.controller.handle_click(point, now);
			tracing::trace!(?outcome, x = point.0, y = point.1, "photo clicked");
		}
		if input.reveal {
			self.controller.reveal_answers(now);
		}
		if input.new_word {
			self.controller.start_round(now);
		}
		if input.play_audio {
			self.controller.replay_word();
		}
		for phrase in self.controller.take_narration() {
			narrator.say(phrase);
		}

		input.change_level.then_some(GameAction::ChangeLevel)
	}

	/// Texture for the current round, re-rendered when the state changed.
	fn texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
		let state = self.controller.state();
		let round = state.round.as_ref()?;
		if let Some((revision, texture)) = &self.texture {
			if *revision == state.revision {
				return Some(texture.clone());
			}
		}

		let image = crate::game::render(round, state.revealed);
		let size = [image.width() as usize, image.height() as usize];
		let color = egui::ColorImage::from_rgb(size, &image.get_bytes());
		let texture = ctx.load_texture("round-photo", color, egui::TextureOptions::LINEAR);
		self.texture = Some((state.revision, texture.clone()));
		Some(texture)
	}
}

fn score_rows(ui: &mut egui::Ui, state: &GameState) {
	let board = &state.scoreboard;
	ui.label(RichText::new(tr!("score", score = board.score())).size(16.0).strong());

	let average = board.average_response().map_or(0.0, |d| d.as_secs_f64());
	ui.horizontal(|ui| {
		let width = ui.available_width();
		ui.add_space((width / 2.0 - 150.0).max(0.0));
		ui.label(RichText::new(tr!("stat-correct", count = board.correct())).color(Color32::from_rgb(0x22, 0x8B, 0x22)));
		ui.label(RichText::new(tr!("stat-incorrect", count = board.incorrect())).color(FAILURE));
		ui.label(RichText::new(tr!("stat-average", seconds = format!("{average:.1}"))).color(HEADLINE));
	});
}

fn feedback(feedback: &Feedback) -> (String, Color32) {
	match feedback {
		Feedback::FindMore { remaining } => (tr!("feedback-find-more", remaining = (*remaining)), SUCCESS),
		Feedback::FoundAll => (tr!("feedback-found-all"), SUCCESS),
		Feedback::AlreadyFound => (tr!("feedback-already-found"), SUCCESS),
		Feedback::TryAgain => (tr!("feedback-try-again"), FAILURE),
		Feedback::Missed { count, category } => {
			(tr!("feedback-missed", count = (*count), category = category.clone()), FAILURE)
		}
		Feedback::Learning { word, remaining } => {
			(tr!("feedback-learning", word = word.clone(), remaining = (*remaining)), LEARNING)
		}
	}
}

fn placeholder_text(placeholder: &Placeholder) -> String {
	match placeholder {
		Placeholder::NoCategories => tr!("placeholder-no-categories"),
		Placeholder::UnknownCategory(name) => tr!("placeholder-unknown-category", name = name.clone()),
		Placeholder::NoImages => tr!("placeholder-no-images"),
		Placeholder::NoSuitableImages(category) => tr!("placeholder-no-suitable-images", category = category.clone()),
	}
}
