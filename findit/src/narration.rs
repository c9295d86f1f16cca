//! Spoken prompts.
//!
//! Each phrase is synthesized over HTTP into a temporary mp3 and played on the
//! default output device from its own short-lived thread, so the UI never
//! waits on the network or the speakers. A newer phrase cuts off an older one.

use std::{
	fs::File,
	io::{BufReader, Write},
	path::Path,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};

use crate::config::Config;

const TTS_URL: &str = "https://translate.google.com/translate_tts";

/// How often playback checks whether it has been superseded.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Numbers handed to phrases in order; only the newest may keep playing.
#[derive(Debug, Clone, Default)]
struct Turns(Arc<AtomicU64>);

impl Turns {
	fn take(&self) -> u64 {
		self.0.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn is_current(&self, turn: u64) -> bool {
		self.0.load(Ordering::SeqCst) == turn
	}
}

#[derive(Debug, Clone)]
pub struct Narrator {
	enabled: bool,
	language: String,
	turns: Turns,
}

impl Narrator {
	pub fn new(enabled: bool, language: impl Into<String>) -> Self {
		Self { enabled, language: language.into(), turns: Turns::default() }
	}

	pub fn from_config(config: &Config) -> Self {
		Self::new(config.narration_enabled, config.narration_language.clone())
	}

	/// Pick up changed settings. Whatever is playing now is cut off.
	pub fn apply(&mut self, config: &Config) {
		self.enabled = config.narration_enabled;
		self.language = config.narration_language.clone();
		self.turns.take();
	}

	/// Speak `text` in the background, replacing any phrase still playing.
	/// Failures are logged and otherwise ignored.
	pub fn say(&self, text: impl Into<String>) {
		let text = text.into();
		if !self.enabled || text.trim().is_empty() {
			return;
		}
		let language = self.language.clone();
		let turns = self.turns.clone();
		let turn = turns.take();
		let spawned = std::thread::Builder::new().name("narration".into()).spawn(move || {
			if let Err(err) = speak(&text, &language, || turns.is_current(turn)) {
				tracing::debug!(error = %format!("{err:#}"), text, "narration failed");
			}
		});
		if let Err(err) = spawned {
			tracing::warn!(error = %err, "failed to start narration thread");
		}
	}
}

fn speak(text: &str, language: &str, current: impl Fn() -> bool) -> Result<()> {
	let mut file = tempfile::Builder::new()
		.prefix("findit-")
		.suffix(".mp3")
		.tempfile()
		.context("create temporary mp3")?;
	let bytes = synthesize(text, language, file.as_file_mut())?;
	file.flush().context("flush temporary mp3")?;
	tracing::trace!(bytes, text, "speech synthesized");

	if current() {
		play(file.path(), current)?;
	}
	file.close().context("remove temporary mp3")
}

/// Fetch mp3 speech for `text` into `out`, returning the byte count.
fn synthesize(text: &str, language: &str, out: &mut impl Write) -> Result<u64> {
	let res = ureq::get(TTS_URL)
		.query("ie", "UTF-8")
		.query("client", "tw-ob")
		.query("tl", language)
		.query("q", text)
		.call()
		.with_context(|| format!("GET {TTS_URL} for {text:?}"))?;
	let mut reader = res.into_body().into_reader();
	let bytes = std::io::copy(&mut reader, out).context("read speech body")?;
	if bytes == 0 {
		bail!("speech service returned no audio");
	}
	Ok(bytes)
}

/// Play an audio file on the default output device until it ends or `current` turns false.
fn play(path: &Path, current: impl Fn() -> bool) -> Result<()> {
	let (_stream, handle) = rodio::OutputStream::try_default().map_err(|err| anyhow!("open audio output: {err}"))?;
	let sink = rodio::Sink::try_new(&handle).map_err(|err| anyhow!("create audio sink: {err}"))?;
	let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
	let source = rodio::Decoder::new(BufReader::new(file)).map_err(|err| anyhow!("decode speech: {err}"))?;
	sink.append(source);
	while !sink.empty() {
		if !current() {
			sink.stop();
			break;
		}
		std::thread::sleep(POLL_INTERVAL);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn follows_config() {
		let config = Config { narration_enabled: false, narration_language: "en-uk".into(), ..Config::default() };
		let narrator = Narrator::from_config(&config);
		assert!(!narrator.enabled);
		assert_eq!(narrator.language, "en-uk");
		// Disabled: returns without taking a turn.
		narrator.say("Find dog");
		assert!(narrator.turns.is_current(0));
	}

	#[test]
	fn newer_phrase_supersedes_older() {
		let turns = Turns::default();
		let shared = turns.clone();
		let first = turns.take();
		assert!(shared.is_current(first));
		let second = shared.take();
		assert!(!turns.is_current(first));
		assert!(turns.is_current(second));
	}

	#[test]
	fn changing_settings_cuts_off_playback() {
		let mut narrator = Narrator::new(true, "en");
		let playing = narrator.turns.take();
		let config = Config { narration_enabled: false, narration_language: "fr".into(), ..Config::default() };
		narrator.apply(&config);
		assert!(!narrator.turns.is_current(playing));
		assert!(!narrator.enabled);
		assert_eq!(narrator.language, "fr");
	}

	#[test]
	fn play_rejects_non_audio() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"definitely not an mp3").unwrap();
		assert!(play(file.path(), || true).is_err());
	}
}
