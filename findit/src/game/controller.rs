use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use dataset::ImageId;
use imaging::OwnedImage;

use super::{
	AnswersButton, Catalog, Feedback, GameState, Hit, Instruction, Level, Mode, Placeholder, Region, Round, qualify,
};

/// Clicks closer together than this are treated as one.
pub const CLICK_DEBOUNCE: Duration = Duration::from_millis(100);
/// Pause after finding everything before the next round.
pub const FOUND_ALL_DELAY: Duration = Duration::from_millis(1500);
/// Pause after revealing the answers before the next round.
pub const REVEAL_DELAY: Duration = Duration::from_millis(3000);
/// Random photos tried for one category before giving up on it.
pub const MAX_IMAGE_ATTEMPTS: usize = 5;
/// Categories tried in a row before the quiz reports that nothing fits.
pub const MAX_CATEGORY_PICKS: usize = 20;
pub const LEARNING_REPETITIONS: u32 = 3;
/// Misses in a multi-target round after which "show answers" is highlighted.
pub const HIGHLIGHT_ANSWERS_AFTER: usize = 3;
/// Misses in a round that switch the quiz into learning mode.
pub const LEARNING_AFTER: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
	/// No round, inside the debounce window, or waiting for the next round.
	Ignored,
	Found { remaining: usize },
	RoundComplete,
	AlreadyFound,
	Miss,
}

pub struct RoundController {
	catalog: Arc<dyn Catalog>,
	rng: StdRng,
	display: (u32, u32),
	state: GameState,
	last_click: Option<Instant>,
	advance_at: Option<Instant>,
	narration: Vec<String>,
}

impl RoundController {
	pub fn new(catalog: Arc<dyn Catalog>, level: Level, display: (u32, u32)) -> Self {
		Self::with_rng(catalog, level, display, StdRng::from_entropy())
	}

	pub fn with_rng(catalog: Arc<dyn Catalog>, level: Level, display: (u32, u32), rng: StdRng) -> Self {
		Self {
			catalog,
			rng,
			display,
			state: GameState::new(level),
			last_click: None,
			advance_at: None,
			narration: Vec::new(),
		}
	}

	pub fn state(&self) -> &GameState {
		&self.state
	}

	/// Size later rounds are resized to. The current round keeps its photo.
	pub fn set_display_size(&mut self, display: (u32, u32)) {
		self.display = display;
	}

	/// Drop the current round and start another one.
	pub fn start_round(&mut self, now: Instant) {
		self.advance_at = None;
		let state = &mut self.state;
		state.revision += 1;
		state.round = None;
		state.placeholder = None;
		state.feedback = None;
		state.instruction = Instruction::ClickObject;
		state.answers = AnswersButton::Hidden;
		state.revealed = false;

		let repetition = match &mut state.mode {
			Mode::Learning { category, word, repetitions_left } if *repetitions_left > 0 => {
				let remaining = *repetitions_left;
				*repetitions_left -= 1;
				Some((category.clone(), word.clone(), remaining))
			}
			_ => None,
		};

		let (mut category, mut word) = match repetition {
			Some((category, word, remaining)) => {
				self.state.feedback = Some(Feedback::Learning { word: word.clone(), remaining });
				(category, word)
			}
			None => {
				self.state.mode = Mode::Quiz;
				let Some(picked) = self.pick_category() else {
					self.state.placeholder = Some(Placeholder::NoCategories);
					return;
				};
				picked
			}
		};

		let mut picks = 1;
		let (targets, photo) = loop {
			match self.find_photo(&category) {
				Ok(found) => break found,
				Err(Placeholder::NoSuitableImages(_)) if !self.state.mode.is_learning() && picks < MAX_CATEGORY_PICKS => {
					picks += 1;
					let Some(picked) = self.pick_category() else {
						self.state.placeholder = Some(Placeholder::NoCategories);
						return;
					};
					(category, word) = picked;
				}
				Err(placeholder) => {
					tracing::info!(?placeholder, "no round could be started");
					self.state.placeholder = Some(placeholder);
					return;
				}
			}
		};

		let original = (photo.width(), photo.height());
		let photo = match photo.resized(self.display.0, self.display.1) {
			Ok(photo) => photo,
			Err(err) => {
				tracing::warn!(error = %format!("{err:#}"), "failed to resize photo");
				self.state.placeholder = Some(Placeholder::NoSuitableImages(category));
				return;
			}
		};

		let round = Round::new(category, word.clone(), targets, photo, original, now);
		if round.total() > 1 {
			self.state.instruction = Instruction::FindAll { count: round.total() };
			self.state.answers = AnswersButton::Visible;
		}
		tracing::debug!(category = %round.category, targets = round.total(), "round started");
		self.state.round = Some(round);
		self.narration.push(format!("Find {word}"));
		self.state.word = Some(word);
	}

	/// Random category as `(lowercase name, name as listed)`.
	fn pick_category(&mut self) -> Option<(String, String)> {
		let names = self.catalog.category_names();
		let name = names.choose(&mut self.rng)?;
		Some((name.to_lowercase(), name.clone()))
	}

	/// Look for a photo of `category` that suits the current level.
	fn find_photo(&mut self, category: &str) -> Result<(Vec<Region>, OwnedImage), Placeholder> {
		if !self.catalog.has_category(category) {
			return Err(Placeholder::UnknownCategory(category.to_owned()));
		}
		let ids = self.catalog.image_ids(category);
		if ids.is_empty() {
			return Err(Placeholder::NoImages);
		}

		let max = self.state.level.max_instances();
		for _ in 0..MAX_IMAGE_ATTEMPTS {
			let Some(&id) = ids.choose(&mut self.rng) else { break };
			let Some(targets) = qualify(&self.catalog.boxes(id, category), max) else {
				tracing::trace!(%id, category, "photo does not qualify");
				continue;
			};
			match self.load(id) {
				Some(photo) => return Ok((targets, photo)),
				None => continue,
			}
		}
		Err(Placeholder::NoSuitableImages(category.to_owned()))
	}

	fn load(&self, id: ImageId) -> Option<OwnedImage> {
		self.catalog
			.load_image(id)
			.inspect_err(|err| tracing::warn!(%id, error = %format!("{err:#}"), "failed to load photo"))
			.ok()
	}

	/// A click on the photo at `point`, in display pixels.
	pub fn handle_click(&mut self, point: (f32, f32), now: Instant) -> ClickOutcome {
		if self.advance_at.is_some() {
			return ClickOutcome::Ignored;
		}
		let state = &mut self.state;
		let Some(round) = state.round.as_mut() else {
			return ClickOutcome::Ignored;
		};
		if self.last_click.is_some_and(|last| now.saturating_duration_since(last) < CLICK_DEBOUNCE) {
			return ClickOutcome::Ignored;
		}
		self.last_click = Some(now);

		let learning = state.mode.is_learning();
		let outcome = match round.hit_test(point) {
			Hit::Found(i) => {
				round.mark_found(i);
				if round.is_complete() {
					if !learning {
						state.scoreboard.record_correct(now.saturating_duration_since(round.started_at));
					}
					state.feedback = Some(Feedback::FoundAll);
					self.narration.push("Great! You found all of them!".into());
					self.advance_at = Some(now + FOUND_ALL_DELAY);
					ClickOutcome::RoundComplete
				} else {
					let remaining = round.remaining();
					state.feedback = Some(Feedback::FindMore { remaining });
					self.narration.push("Good job! Find more!".into());
					ClickOutcome::Found { remaining }
				}
			}
			Hit::AlreadyFound(_) => {
				state.feedback = Some(Feedback::AlreadyFound);
				ClickOutcome::AlreadyFound
			}
			Hit::Miss { x, y } => {
				round.record_miss((x, y));
				if !learning {
					state.scoreboard.record_incorrect(1);
				}
				let misses = round.misses().len();
				if misses >= HIGHLIGHT_ANSWERS_AFTER && round.total() > 1 {
					state.answers = AnswersButton::Highlighted;
				}
				state.feedback = Some(Feedback::TryAgain);
				self.narration.push("Try again".into());
				if !learning && misses >= LEARNING_AFTER {
					tracing::info!(category = %round.category, "too many misses, switching to learning mode");
					state.mode = learning_mode(&round.category);
				}
				ClickOutcome::Miss
			}
		};
		state.revision += 1;
		outcome
	}

	/// Show where every target was and move on after a pause.
	///
	/// Returns `false` when there is nothing to reveal.
	pub fn reveal_answers(&mut self, now: Instant) -> bool {
		if self.advance_at.is_some() {
			return false;
		}
		let state = &mut self.state;
		let Some(round) = state.round.as_ref() else {
			return false;
		};

		let missed = round.remaining();
		let learning = state.mode.is_learning();
		if !learning && missed > 0 {
			state.scoreboard.record_incorrect(missed as u32);
		}
		if missed > 0 {
			state.feedback = Some(Feedback::Missed { count: missed, category: round.category.clone() });
			self.narration.push(format!("You missed {missed} objects"));
		}
		if !learning {
			state.mode = learning_mode(&round.category);
		}
		state.revealed = true;
		state.revision += 1;
		self.advance_at = Some(now + REVEAL_DELAY);
		true
	}

	/// Advance to the next round once its deadline has passed. Returns whether it did.
	pub fn tick(&mut self, now: Instant) -> bool {
		match self.advance_at {
			Some(at) if now >= at => {
				self.start_round(now);
				true
			}
			_ => false,
		}
	}

	/// Time left until the next round starts on its own.
	pub fn pending_advance(&self, now: Instant) -> Option<Duration> {
		self.advance_at.map(|at| at.saturating_duration_since(now))
	}

	/// Queue the current word for narration again.
	pub fn replay_word(&mut self) {
		if let Some(word) = self.state.round.as_ref().and(self.state.word.as_ref()) {
			self.narration.push(format!("Find {word}"));
		}
	}

	/// Phrases to speak, oldest first.
	pub fn take_narration(&mut self) -> Vec<String> {
		std::mem::take(&mut self.narration)
	}
}

fn learning_mode(category: &str) -> Mode {
	Mode::Learning {
		category: category.to_owned(),
		word: capitalize(category),
		repetitions_left: LEARNING_REPETITIONS,
	}
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
