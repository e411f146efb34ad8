// Manages local file storage for saved cards.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to CardConfiguration or its nested types (Contact, NameOrder, ...)
// require incrementing CARD_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::card::CardConfiguration;
use crate::model::form::is_valid_slug;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: camelCase CardConfiguration with address_line1/address_line2
const CARD_STORAGE_VERSION: u32 = 1;

/// Wrapper struct for versioned card files
#[derive(Serialize, Deserialize)]
struct StoredCard {
    #[serde(default)]
    version: u32,
    card: CardConfiguration,
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        let name = lock_path
            .file_name()
            .map(|n| format!("{}.lock", n.to_string_lossy()))
            .unwrap_or_else(|| "wedcard.lock".to_string());
        lock_path.set_file_name(name);
        lock_path
    }

    /// Run `f` while holding an exclusive lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Card ids double as file names, so only url slugs are accepted.
    fn card_path(ctx: &dyn AppContext, id: &str) -> Result<PathBuf> {
        if !is_valid_slug(id) {
            anyhow::bail!("Invalid card id '{}'", id);
        }
        Ok(ctx.get_cards_dir()?.join(format!("{}.json", id)))
    }

    pub fn save_card(ctx: &dyn AppContext, card: &CardConfiguration) -> Result<()> {
        let path = Self::card_path(ctx, &card.card_url)?;
        Self::with_lock(&path, || {
            let data = StoredCard {
                version: CARD_STORAGE_VERSION,
                card: card.clone(),
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&path, json)?;
            Ok(())
        })
    }

    /// Load a card by id. `Ok(None)` when no such card was saved.
    pub fn load_card(ctx: &dyn AppContext, id: &str) -> Result<Option<CardConfiguration>> {
        let path = Self::card_path(ctx, id)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read card file '{}'", path.display()))?;

            // Bare records (no version wrapper) are what the demo page kept.
            let card = match serde_json::from_str::<StoredCard>(&json) {
                Ok(data) => {
                    if data.version != CARD_STORAGE_VERSION {
                        log::warn!(
                            "Card '{}' has storage version {}, expected {}",
                            id,
                            data.version,
                            CARD_STORAGE_VERSION
                        );
                    }
                    data.card
                }
                Err(_) => serde_json::from_str::<CardConfiguration>(&json).with_context(|| {
                    format!("Failed to parse card file '{}'", path.display())
                })?,
            };
            Ok(Some(card))
        })
    }

    pub fn delete_card(ctx: &dyn AppContext, id: &str) -> Result<bool> {
        let path = Self::card_path(ctx, id)?;
        if !path.exists() {
            return Ok(false);
        }
        Self::with_lock(&path, || Ok(fs::remove_file(&path).map(|_| true)?))
    }

    /// Ids of every saved card, sorted.
    pub fn list_cards(ctx: &dyn AppContext) -> Result<Vec<String>> {
        let mut ids: Vec<String> = fs::read_dir(ctx.get_cards_dir()?)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    path.file_stem().map(|s| s.to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_save_load_and_list() {
        let ctx = TestContext::new();
        let mut card = CardConfiguration::sample();
        LocalStorage::save_card(&ctx, &card).unwrap();

        card.card_url = "second-card".to_string();
        LocalStorage::save_card(&ctx, &card).unwrap();

        let loaded = LocalStorage::load_card(&ctx, "ahmad-nora").unwrap().unwrap();
        assert_eq!(loaded.groom_nickname, "Ahmad");
        assert_eq!(
            LocalStorage::list_cards(&ctx).unwrap(),
            vec!["ahmad-nora".to_string(), "second-card".to_string()]
        );
    }

    #[test]
    fn test_missing_card_is_none() {
        let ctx = TestContext::new();
        assert_eq!(LocalStorage::load_card(&ctx, "nobody").unwrap(), None);
        assert!(!LocalStorage::delete_card(&ctx, "nobody").unwrap());
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let ctx = TestContext::new();
        assert!(LocalStorage::load_card(&ctx, "../config").is_err());
        assert!(LocalStorage::load_card(&ctx, "").is_err());
    }

    #[test]
    fn test_reads_unversioned_record() {
        let ctx = TestContext::new();
        let card = CardConfiguration::sample();
        let path = ctx.get_cards_dir().unwrap().join("legacy.json");
        fs::write(&path, serde_json::to_string(&card).unwrap()).unwrap();
        let loaded = LocalStorage::load_card(&ctx, "legacy").unwrap();
        assert_eq!(loaded, Some(card));
    }

    #[test]
    fn test_delete_card() {
        let ctx = TestContext::new();
        let card = CardConfiguration::sample();
        LocalStorage::save_card(&ctx, &card).unwrap();
        assert!(LocalStorage::delete_card(&ctx, &card.card_url).unwrap());
        assert_eq!(LocalStorage::load_card(&ctx, &card.card_url).unwrap(), None);
    }
}
