//! FindIt: an English vocabulary game on top of COCO photos.
//!
//! The player is asked to click every instance of a named object in a photo.
//! [`game`] holds the rules and state, [`ui`] draws them with egui.

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub mod config;
pub mod game;
pub mod i18n;
pub mod loader;
pub mod narration;
pub mod ui;

use config::Config;

static CONFIG: LazyLock<Mutex<Config>> = LazyLock::new(|| Mutex::new(Config::load_or_default()));

/// Process-wide configuration. Hold the guard only briefly.
pub fn config() -> MutexGuard<'static, Config> {
	CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}
