//! Persistent application configuration.
//!
//! Stored as JSON in a platform-appropriate config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Overrides the dataset directory from the config file.
pub const DATASET_DIR_ENV: &str = "FINDIT_DATASET_DIR";

/// On-disk configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speak prompts and feedback out loud.
    pub narration_enabled: bool,

    /// Language tag passed to the speech service ("en", "en-uk", ...).
    pub narration_language: String,

    /// Extra zoom on top of the OS scale factor.
    pub ui_zoom_factor: f32,

    /// Size photos are shown at, in points.
    pub display_width: u32,
    pub display_height: u32,

    /// Where the COCO archive is unpacked. `None` uses the cache directory.
    pub dataset_dir: Option<PathBuf>,

    /// UI language. `None` follows the system.
    pub locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            narration_enabled: true,
            narration_language: "en".to_string(),
            ui_zoom_factor: 1.0,
            display_width: 300,
            display_height: 300,
            dataset_dir: None,
            locale: None,
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("config_dir() unavailable")?;
        Ok(base.join("FindIt").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to load config; using defaults");
                Self::default()
            }
        }
    }

    /// Try to load configuration from disk. A missing file yields the defaults.
    pub fn try_load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).with_context(|| format!("read {path:?}"))?;
        let cfg = serde_json::from_str(&json).with_context(|| format!("parse {path:?}"))?;
        Ok(cfg)
    }

    /// Save configuration to disk, logging instead of failing.
    pub fn save(&self) {
        if let Err(err) = Self::path().and_then(|path| self.save_to(&path)) {
            tracing::warn!(error = %format!("{err:#}"), "failed to save config");
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent:?}"))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, json).with_context(|| format!("write {path:?}"))?;
        Ok(())
    }

    /// Display size with both sides at least 1.
    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width.max(1), self.display_height.max(1))
    }

    /// Where the dataset lives: environment override, then config, then the cache dir.
    pub fn dataset_dir(&self) -> Option<PathBuf> {
        resolve_dataset_dir(
            std::env::var_os(DATASET_DIR_ENV).map(PathBuf::from),
            self.dataset_dir.clone(),
            dataset::Dataset::default_dir(),
        )
    }
}

pub fn resolve_dataset_dir(
    env: Option<PathBuf>,
    configured: Option<PathBuf>,
    fallback: Option<PathBuf>,
) -> Option<PathBuf> {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
    env.filter(non_empty).or(configured.filter(non_empty)).or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let cfg = Config {
            narration_enabled: false,
            display_width: 400,
            locale: Some("en".into()),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"ui_zoom_factor": 1.5}"#).unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.ui_zoom_factor, 1.5);
        assert!(cfg.narration_enabled);
        assert_eq!(cfg.display_size(), (300, 300));
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn dataset_dir_prefers_env_then_config() {
        let env = Some(PathBuf::from("/env"));
        let cfg = Some(PathBuf::from("/cfg"));
        let cache = Some(PathBuf::from("/cache"));

        assert_eq!(resolve_dataset_dir(env.clone(), cfg.clone(), cache.clone()), env);
        assert_eq!(resolve_dataset_dir(None, cfg.clone(), cache.clone()), cfg);
        assert_eq!(resolve_dataset_dir(Some(PathBuf::new()), None, cache.clone()), cache);
        assert_eq!(resolve_dataset_dir(None, None, None), None);
    }
}
