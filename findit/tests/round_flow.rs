//! Whole rounds played through the public controller API against an in-memory catalog.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use dataset::{BBox, ImageId};
use findit::game::{self, Catalog, ClickOutcome, Feedback, Level, Mode, Placeholder, RoundController};
use imaging::{Color, OwnedImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Every photo is 640x480 and shown at 320x240, so display = original / 2.
struct Album {
	photos: BTreeMap<u64, (&'static str, Vec<BBox>)>,
}

fn bbox(x: f64, y: f64, width: f64, height: f64) -> BBox {
	BBox { x, y, width, height }
}

impl Album {
	fn new() -> Self {
		let mut photos = BTreeMap::new();
		photos.insert(1, ("dog", vec![bbox(10.0, 10.0, 200.0, 150.0)]));
		photos.insert(2, ("dog", vec![bbox(10.0, 10.0, 120.0, 120.0), bbox(300.0, 200.0, 150.0, 150.0)]));
		photos.insert(3, ("dog", vec![
			bbox(0.0, 0.0, 100.0, 100.0),
			bbox(200.0, 0.0, 100.0, 100.0),
			bbox(400.0, 0.0, 100.0, 100.0),
		]));
		photos.insert(4, ("Kite", vec![bbox(100.0, 100.0, 90.0, 90.0), bbox(0.0, 0.0, 5.0, 5.0)]));
		Self { photos }
	}
}

impl Catalog for Album {
	fn category_names(&self) -> Vec<String> {
		let mut names = self.photos.values().map(|(c, _)| c.to_string()).collect::<Vec<_>>();
		names.sort();
		names.dedup();
		names
	}

	fn has_category(&self, name: &str) -> bool {
		self.photos.values().any(|(c, _)| c.eq_ignore_ascii_case(name))
	}

	fn image_ids(&self, category: &str) -> Vec<ImageId> {
		self.photos
			.iter()
			.filter(|(_, (c, _))| c.eq_ignore_ascii_case(category))
			.map(|(&id, _)| ImageId(id))
			.collect()
	}

	fn boxes(&self, image: ImageId, category: &str) -> Vec<BBox> {
		self.photos
			.get(&image.0)
			.filter(|(c, _)| c.eq_ignore_ascii_case(category))
			.map(|(_, boxes)| boxes.clone())
			.unwrap_or_default()
	}

	fn load_image(&self, image: ImageId) -> anyhow::Result<OwnedImage> {
		self.photos.get(&image.0).context("unknown photo")?;
		Ok(OwnedImage::filled(640, 480, Color::WHITE))
	}
}

fn controller(level: Level, seed: u64) -> RoundController {
	RoundController::with_rng(Arc::new(Album::new()), level, (320, 240), StdRng::seed_from_u64(seed))
}

/// Display-space centre of every target in the current round.
fn target_centres(c: &RoundController) -> Vec<(f32, f32)> {
	let round = c.state().round.as_ref().expect("round in progress");
	round
		.targets()
		.iter()
		.map(|t| round.to_display(((t.x1 + t.x2) as f32 / 2.0, (t.y1 + t.y2) as f32 / 2.0)))
		.collect()
}

#[test]
fn levels_bound_the_number_of_targets() {
	for level in Level::ALL {
		for seed in 0..20 {
			let mut c = controller(level, seed);
			c.start_round(Instant::now());
			let round = c.state().round.as_ref().expect("album always has a suitable photo");
			assert!(round.total() >= 1);
			assert!(round.total() <= level.max_instances(), "{level:?} got {} targets", round.total());
		}
	}
}

#[test]
fn playing_rounds_keeps_score_in_range() {
	let mut c = controller(Level::Three, 42);
	let mut now = Instant::now();
	c.start_round(now);

	for _ in 0..10 {
		// One miss in a corner no target reaches, then every target.
		now += Duration::from_millis(300);
		assert_eq!(c.handle_click((319.0, 239.0), now), ClickOutcome::Miss);

		let centres = target_centres(&c);
		for (i, centre) in centres.iter().enumerate() {
			now += Duration::from_millis(300);
			let outcome = c.handle_click(*centre, now);
			if i + 1 == centres.len() {
				assert_eq!(outcome, ClickOutcome::RoundComplete);
			} else {
				assert_eq!(outcome, ClickOutcome::Found { remaining: centres.len() - i - 1 });
			}
		}

		let round = c.state().round.as_ref().unwrap();
		assert_eq!(round.found_count(), round.total());
		let score = c.state().scoreboard.score();
		assert!(score > 0 && score <= game::MAX_SCORE);

		now += Duration::from_secs(2);
		assert!(c.tick(now));
	}

	let board = &c.state().scoreboard;
	assert_eq!(board.correct(), 10);
	assert_eq!(board.incorrect(), 10);
}

#[test]
fn five_misses_start_learning_and_reveal_draws_the_answers() {
	let mut c = controller(Level::One, 3);
	let mut now = Instant::now();
	c.start_round(now);
	let category = c.state().round.as_ref().unwrap().category.clone();

	for _ in 0..5 {
		now += Duration::from_millis(150);
		c.handle_click((319.0, 239.0), now);
	}
	match &c.state().mode {
		Mode::Learning { category: learning, repetitions_left, .. } => {
			assert_eq!(learning, &category);
			assert_eq!(*repetitions_left, 3);
		}
		Mode::Quiz => panic!("five misses should switch to learning"),
	}

	assert!(c.reveal_answers(now));
	assert_eq!(c.state().feedback, Some(Feedback::Missed { count: 1, category: category.clone() }));
	// Revealing during learning adds nothing.
	assert_eq!(c.state().scoreboard.incorrect(), 5);

	let state = c.state();
	let round = state.round.as_ref().unwrap();
	let target = round.targets()[0];
	let (x, y) = round.to_display((target.x1 as f32, (target.y1 + target.y2) as f32 / 2.0));
	let image = game::render(round, state.revealed);
	assert_eq!(image.pixel(x.round() as u32 + 1, y.round() as u32), Some(Color::RED));

	now += Duration::from_secs(3);
	assert!(c.tick(now));
	assert_eq!(c.state().round.as_ref().unwrap().category, category);
	assert!(matches!(c.state().feedback, Some(Feedback::Learning { remaining: 3, .. })));
}

#[test]
fn unknown_category_shows_a_placeholder() {
	struct Empty;
	impl Catalog for Empty {
		fn category_names(&self) -> Vec<String> {
			vec!["unicorn".into()]
		}
		fn has_category(&self, _: &str) -> bool {
			false
		}
		fn image_ids(&self, _: &str) -> Vec<ImageId> {
			Vec::new()
		}
		fn boxes(&self, _: ImageId, _: &str) -> Vec<BBox> {
			Vec::new()
		}
		fn load_image(&self, _: ImageId) -> anyhow::Result<OwnedImage> {
			anyhow::bail!("no photos")
		}
	}

	let mut c = RoundController::with_rng(Arc::new(Empty), Level::One, (320, 240), StdRng::seed_from_u64(1));
	c.start_round(Instant::now());
	assert_eq!(c.state().placeholder, Some(Placeholder::UnknownCategory("unicorn".into())));
	assert!(c.take_narration().is_empty());
}
