// File: ./src/source.rs
// Where invitation pages get their card data from.
use crate::context::AppContext;
use crate::model::card::CardConfiguration;
use crate::model::form::is_valid_slug;
use crate::storage::LocalStorage;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

/// Looks up a card by its url slug. `Ok(None)` means "no such card" and is
/// rendered as the not-found page; `Err` is a real failure (I/O, parse).
pub trait CardSource: Send + Sync {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Option<CardConfiguration>>> + Send;
}

/// In-memory cards. The default holds the built-in demo card.
#[derive(Debug, Clone)]
pub struct SampleSource {
    cards: Vec<CardConfiguration>,
}

impl Default for SampleSource {
    fn default() -> Self {
        Self {
            cards: vec![CardConfiguration::sample()],
        }
    }
}

impl SampleSource {
    pub fn new(cards: Vec<CardConfiguration>) -> Self {
        Self { cards }
    }
}

impl CardSource for SampleSource {
    async fn fetch(&self, id: &str) -> Result<Option<CardConfiguration>> {
        Ok(self.cards.iter().find(|c| c.card_url == id).cloned())
    }
}

/// Cards saved by the wizard in the data directory.
#[derive(Debug, Clone)]
pub struct LocalCardStore {
    ctx: Arc<dyn AppContext>,
}

impl LocalCardStore {
    pub fn new(ctx: Arc<dyn AppContext>) -> Self {
        Self { ctx }
    }
}

impl CardSource for LocalCardStore {
    async fn fetch(&self, id: &str) -> Result<Option<CardConfiguration>> {
        // Not a slug, so it cannot have been saved.
        if !is_valid_slug(id) {
            log::debug!("Rejecting card lookup for invalid id '{}'", id);
            return Ok(None);
        }
        let ctx = self.ctx.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || LocalStorage::load_card(ctx.as_ref(), &id)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[tokio::test]
    async fn test_sample_source() {
        let source = SampleSource::default();
        let card = source.fetch("ahmad-nora").await.unwrap().unwrap();
        assert_eq!(card.bride_nickname, "Nora");
        assert!(source.fetch("someone-else").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let ctx = Arc::new(TestContext::new());
        let mut card = CardConfiguration::sample();
        card.card_url = "faris-sarah".to_string();
        LocalStorage::save_card(ctx.as_ref(), &card).unwrap();

        let store = LocalCardStore::new(ctx);
        assert_eq!(store.fetch("faris-sarah").await.unwrap(), Some(card));
        assert!(store.fetch("ahmad-nora").await.unwrap().is_none());
        assert!(store.fetch("../etc/passwd").await.unwrap().is_none());
    }
}
