use crate::error::Result;
use dex_protocol::{Record, RecordFilter};
use dex_store::CatalogStore;
use std::sync::Arc;

/// Indexed text search delegated to the store.
#[derive(Clone)]
pub struct LexicalSearch {
    store: Arc<dyn CatalogStore>,
}

impl LexicalSearch {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Records ordered by the store's text relevance, at most `limit`.
    /// A missing text index is returned as an error; callers decide the fallback.
    pub async fn search(&self, text: &str, filter: &RecordFilter, limit: usize) -> Result<Vec<Record>> {
        let hits = self.store.text_search(text, filter, limit).await?;
        log::debug!("Lexical: {} results", hits.len());
        Ok(hits.into_iter().take(limit).map(|hit| hit.record).collect())
    }
}
