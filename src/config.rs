// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::locale::CardLocale;
use crate::model::form::CARD_DESIGNS;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;

fn default_card_design() -> String {
    CARD_DESIGNS[0].to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_countdown_tick_secs() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Last language picked in the wizard. `None` until the user picks one.
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub default_card_language: CardLocale,
    #[serde(default = "default_card_design")]
    pub default_card_design: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_countdown_tick_secs")]
    pub countdown_tick_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: None,
            default_card_language: CardLocale::default(),
            default_card_design: default_card_design(),
            log_level: default_log_level(),
            countdown_tick_secs: default_countdown_tick_secs(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Parse errors
    /// still propagate so a broken file is not silently overwritten.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Preferred interface language: the saved one, else the default card
    /// language.
    pub fn preferred_locale(&self) -> CardLocale {
        self.locale
            .as_deref()
            .and_then(|code| code.parse().ok())
            .unwrap_or(self.default_card_language)
    }

    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
