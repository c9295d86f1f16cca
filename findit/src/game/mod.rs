//! The quiz itself, independent of any GUI.
//!
//! [`RoundController`] owns all game state and is driven by three inputs:
//! clicks on the photo, the "show answers" button, and the passage of time.
//! The UI reads [`GameState`] back and draws it with [`render`].

mod catalog;
mod controller;
mod render;
mod round;
mod score;

pub use catalog::Catalog;
pub use controller::{ClickOutcome, RoundController};
pub use render::render;
pub use round::{Hit, Region, Round, qualify};
pub use score::{MAX_SCORE, Scoreboard};

/// Difficulty: the most target instances a photo may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
	One,
	Two,
	Three,
}

impl Level {
	pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

	pub fn max_instances(self) -> usize {
		self.number() as usize
	}

	pub fn number(self) -> u32 {
		match self {
			Level::One => 1,
			Level::Two => 2,
			Level::Three => 3,
		}
	}
}

/// Message under the photo after the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
	FindMore { remaining: usize },
	FoundAll,
	AlreadyFound,
	TryAgain,
	Missed { count: usize, category: String },
	Learning { word: String, remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Instruction {
	#[default]
	ClickObject,
	FindAll { count: usize },
}

/// Shown instead of the photo when no round could be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
	NoCategories,
	UnknownCategory(String),
	NoImages,
	NoSuitableImages(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswersButton {
	#[default]
	Hidden,
	Visible,
	Highlighted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
	#[default]
	Quiz,
	/// Repeating a category the player struggled with. Nothing is scored.
	Learning {
		category: String,
		word: String,
		/// Repetitions still to start. The mode lasts through the round that brought this to 0.
		repetitions_left: u32,
	},
}

impl Mode {
	pub fn is_learning(&self) -> bool {
		matches!(self, Mode::Learning { .. })
	}
}

/// Everything the game screen shows.
#[derive(Debug, Clone)]
pub struct GameState {
	pub level: Level,
	pub scoreboard: Scoreboard,
	pub mode: Mode,
	pub round: Option<Round>,
	pub placeholder: Option<Placeholder>,
	pub feedback: Option<Feedback>,
	pub instruction: Instruction,
	pub answers: AnswersButton,
	/// All targets are drawn, found or not.
	pub revealed: bool,
	/// Word of the latest round, used by "Play Audio".
	pub word: Option<String>,
	/// Bumped on every change, so views know when to redraw.
	pub revision: u64,
}

impl GameState {
	pub fn new(level: Level) -> Self {
		Self {
			level,
			scoreboard: Scoreboard::default(),
			mode: Mode::Quiz,
			round: None,
			placeholder: None,
			feedback: None,
			instruction: Instruction::ClickObject,
			answers: AnswersButton::Hidden,
			revealed: false,
			word: None,
			revision: 0,
		}
	}
}
