// File: ./src/locale.rs
// Card languages and the locale-preference collaborator.
use crate::config::Config;
use crate::context::AppContext;
use crate::error::{FormatError, FormatResult};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use strum::EnumIter;

/// Language an invitation card is written in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
pub enum CardLocale {
    #[default]
    #[serde(rename = "ms", alias = "bahasa")]
    Malay,
    #[serde(rename = "en")]
    English,
}

impl CardLocale {
    /// ISO 639-1 code, also used as the message catalog key.
    pub fn code(self) -> &'static str {
        match self {
            CardLocale::Malay => "ms",
            CardLocale::English => "en",
        }
    }

    /// Locale tables used for weekday and month names.
    pub fn chrono_locale(self) -> chrono::Locale {
        match self {
            CardLocale::Malay => chrono::Locale::ms_MY,
            CardLocale::English => chrono::Locale::en_US,
        }
    }

    /// Name of the language in that language, e.g. "English".
    /// Falls back to the English name when no autonym is known.
    pub fn display_name(self) -> String {
        let Some(lang) = Language::from_639_1(self.code()) else {
            return self.code().to_string();
        };
        lang.to_autonym()
            .map(|s| s.to_string())
            .unwrap_or_else(|| lang.to_name().to_string())
    }

    /// Best guess from the operating system locale, English when unknown.
    pub fn from_system() -> Self {
        sys_locale::get_locale()
            .and_then(|tag| tag.parse().ok())
            .unwrap_or(CardLocale::English)
    }
}

impl FromStr for CardLocale {
    type Err = FormatError;

    /// Accepts bare codes ("ms"), region tags ("en-US", "ms_MY") and the
    /// legacy "bahasa" tag.
    fn from_str(s: &str) -> FormatResult<Self> {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ms" | "bahasa" | "may" | "msa" => Ok(CardLocale::Malay),
            "en" | "eng" => Ok(CardLocale::English),
            _ => Err(FormatError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for CardLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// External store told about card-language changes.
///
/// Notifications are fire-and-forget: implementations must not block the
/// caller on persistence and report their own failures.
pub trait LocalePreference: Send + Sync {
    fn notify(&self, locale: CardLocale);
}

impl<F> LocalePreference for F
where
    F: Fn(CardLocale) + Send + Sync,
{
    fn notify(&self, locale: CardLocale) {
        self(locale)
    }
}

/// Persists the preferred locale into the application config file.
///
/// Writes happen off the caller's task. When several notifications are
/// queued only the newest one is written.
#[derive(Clone, Debug)]
pub struct ConfigLocaleStore {
    ctx: Arc<dyn AppContext>,
    latest: Arc<AtomicU64>,
    write_lock: Arc<Mutex<()>>,
}

impl ConfigLocaleStore {
    pub fn new(ctx: Arc<dyn AppContext>) -> Self {
        Self {
            ctx,
            latest: Arc::new(AtomicU64::new(0)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Synchronously write the locale. Used by `notify` on a background task.
    pub fn persist(ctx: &dyn AppContext, locale: CardLocale) -> anyhow::Result<()> {
        let mut config = Config::load_or_default(ctx)?;
        if config.locale.as_deref() == Some(locale.code()) {
            return Ok(());
        }
        config.locale = Some(locale.code().to_string());
        config.save(ctx)
    }
}

impl LocalePreference for ConfigLocaleStore {
    fn notify(&self, locale: CardLocale) {
        let ctx = self.ctx.clone();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.latest.clone();
        let write_lock = self.write_lock.clone();
        let job = move || {
            let _guard = write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            if latest.load(Ordering::SeqCst) != seq {
                log::debug!("Skipping superseded locale '{}'", locale);
                return;
            }
            if let Err(e) = Self::persist(ctx.as_ref(), locale) {
                log::warn!("Failed to persist locale '{}': {}", locale, e);
            } else {
                log::debug!("Locale preference set to '{}'", locale);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => job(),
        }
    }
}
