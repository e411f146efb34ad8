// Crate root library declaration and module exports.
pub mod config;
pub mod context;
pub mod controller;
pub mod countdown;
pub mod error;
pub mod format;
pub mod invitation;
pub mod locale;
pub mod model;
pub mod source;
pub mod storage;
pub mod wizard;

// Message catalogs for the card languages. Lookups pass the locale
// explicitly, English fills any missing key.
rust_i18n::i18n!("locales", fallback = "en");
