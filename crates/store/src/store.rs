use crate::catalog_file::CatalogFile;
use crate::error::{Result, StoreError};
use crate::text_index::TextIndex;
use crate::types::{FindOptions, FindSort, ScoredRecord};
use async_trait::async_trait;
use dex_protocol::{Record, RecordFilter};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Read-only storage collaborator consumed by the search core.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Indexed text search, ordered by native relevance descending.
    ///
    /// Fails with [`StoreError::TextIndexMissing`] when no text index exists.
    async fn text_search(
        &self,
        text: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Plain filtered retrieval.
    async fn find(&self, filter: &RecordFilter, options: FindOptions) -> Result<Vec<Record>>;

    /// Distinct categories across the catalog, sorted ascending.
    async fn all_categories(&self) -> Result<Vec<String>>;
}

/// In-memory catalog with an optional lexical index.
pub struct MemoryCatalog {
    records: Vec<Record>,
    text_index: Option<TextIndex>,
}

impl MemoryCatalog {
    /// Create a catalog without a text index. Names must be unique
    /// (case-insensitive).
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.identity()) {
                return Err(StoreError::DuplicateName(record.name.clone()));
            }
        }

        Ok(Self {
            records,
            text_index: None,
        })
    }

    #[must_use]
    pub fn with_text_index(mut self) -> Self {
        self.text_index = Some(TextIndex::build(&self.records));
        self
    }

    /// Load a catalog file and optionally build the text index over it.
    pub async fn load(path: impl AsRef<Path>, text_index: bool) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading catalog from {}", path.display());
        let file = CatalogFile::load(path).await?;
        let catalog = Self::new(file.into_records())?;
        log::debug!("Loaded {} records", catalog.len());

        Ok(if text_index {
            catalog.with_text_index()
        } else {
            catalog
        })
    }

    pub fn has_text_index(&self) -> bool {
        self.text_index.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn text_search(
        &self,
        text: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let index = self.text_index.as_ref().ok_or(StoreError::TextIndexMissing)?;

        let results: Vec<ScoredRecord> = index
            .search(text)
            .into_iter()
            .filter_map(|(pos, score)| {
                let record = self.records.get(pos)?;
                filter.matches(record).then(|| ScoredRecord {
                    record: record.clone(),
                    score,
                })
            })
            .take(limit)
            .collect();

        log::debug!("Text search '{}': {} hits (limit {})", text, results.len(), limit);
        Ok(results)
    }

    async fn find(&self, filter: &RecordFilter, options: FindOptions) -> Result<Vec<Record>> {
        let mut matched: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .collect();

        if options.sort == FindSort::NameAscending {
            matched.sort_by_cached_key(|record| record.name.to_lowercase());
        }
        if let Some(limit) = options.limit {
            matched.truncate(limit);
        }

        Ok(matched.into_iter().cloned().collect())
    }

    async fn all_categories(&self) -> Result<Vec<String>> {
        let categories: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|record| record.categories.iter().map(String::as_str))
            .collect();
        Ok(categories.into_iter().map(str::to_string).collect())
    }
}
