use std::time::Duration;

/// Largest possible score: 100 (accuracy) + 50 (speed bonus).
pub const MAX_SCORE: u32 = 150;

const MAX_SPEED_BONUS: f64 = 50.0;
const SPEED_PENALTY_PER_SECOND: f64 = 5.0;

/// Running answer counters for one level session.
///
/// Only ordinary rounds are recorded here; learning repetitions never reach it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
	correct: u32,
	incorrect: u32,
	total_response: Duration,
	responses: u32,
}

impl Scoreboard {
	/// A round was completed after `response` time.
	pub fn record_correct(&mut self, response: Duration) {
		self.correct += 1;
		self.responses += 1;
		self.total_response += response;
	}

	pub fn record_incorrect(&mut self, count: u32) {
		self.incorrect += count;
	}

	pub fn correct(&self) -> u32 {
		self.correct
	}

	pub fn incorrect(&self) -> u32 {
		self.incorrect
	}

	pub fn average_response(&self) -> Option<Duration> {
		(self.responses > 0).then(|| self.total_response / self.responses)
	}

	/// `100 * correct / (correct + incorrect)`, or 0 before any answer.
	pub fn accuracy_percent(&self) -> f64 {
		let attempts = self.correct + self.incorrect;
		if attempts == 0 {
			return 0.0;
		}
		100.0 * f64::from(self.correct) / f64::from(attempts)
	}

	/// `50 - 5 * average seconds`, clamped to `[0, 50]`.
	pub fn speed_bonus(&self) -> f64 {
		let Some(avg) = self.average_response() else { return 0.0 };
		(MAX_SPEED_BONUS - SPEED_PENALTY_PER_SECOND * avg.as_secs_f64()).clamp(0.0, MAX_SPEED_BONUS)
	}

	pub fn score(&self) -> u32 {
		if self.correct == 0 {
			return 0;
		}
		((self.accuracy_percent() + self.speed_bonus()).floor() as u32).min(MAX_SCORE)
	}
}
