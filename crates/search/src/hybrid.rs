use crate::error::Result;
use crate::lexical::LexicalSearch;
use crate::semantic::SemanticSearch;
use dex_protocol::{Record, RecordFilter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitSource {
    Filter,
    Fulltext,
    Semantic,
}

#[derive(Debug, Clone)]
pub struct MergedHit {
    pub record: Record,
    pub source: HitSource,
}

/// Priority fusion of the lexical and semantic paths
#[derive(Clone)]
pub struct HybridSearch {
    lexical: LexicalSearch,
    semantic: SemanticSearch,
}

impl HybridSearch {
    pub fn new(lexical: LexicalSearch, semantic: SemanticSearch) -> Self {
        Self { lexical, semantic }
    }

    pub fn lexical(&self) -> &LexicalSearch {
        &self.lexical
    }

    pub fn semantic(&self) -> &SemanticSearch {
        &self.semantic
    }

    pub async fn search(&self, text: &str, filter: &RecordFilter, limit: usize) -> Result<Vec<Record>> {
        Ok(self
            .search_with_sources(text, filter, limit)
            .await?
            .into_iter()
            .map(|hit| hit.record)
            .collect())
    }

    /// Run both paths concurrently; a failing lexical path contributes nothing,
    /// a failing semantic path fails the search.
    pub async fn search_with_sources(
        &self,
        text: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<MergedHit>> {
        log::debug!("Hybrid search: query='{}', limit={}", text, limit);

        let (lexical, semantic) = tokio::join!(
            self.lexical.search(text, filter, limit),
            self.semantic.search(text, filter, limit)
        );

        let lexical = lexical.unwrap_or_else(|err| {
            log::warn!("Lexical path unavailable, continuing with semantic results: {err}");
            Vec::new()
        });
        let semantic = semantic?;

        let merged = merge_by_priority(lexical, semantic, limit);
        log::debug!("Hybrid: {} merged results", merged.len());
        Ok(merged)
    }
}

/// Lexical hits first in their own order, then semantic hits whose identity
/// is not already present. Relative scores are never compared.
#[must_use]
pub fn merge_by_priority(lexical: Vec<Record>, semantic: Vec<Record>, limit: usize) -> Vec<MergedHit> {
    let mut merged: IndexMap<String, MergedHit> = IndexMap::new();

    for record in lexical {
        merged.entry(record.identity()).or_insert(MergedHit {
            record,
            source: HitSource::Fulltext,
        });
    }
    for record in semantic {
        merged.entry(record.identity()).or_insert(MergedHit {
            record,
            source: HitSource::Semantic,
        });
    }

    merged.into_values().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityScorer;
    use crate::test_support::{catalog, names, record, UnavailableStore};
    use dex_store::CatalogStore;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn hybrid(store: Arc<dyn CatalogStore>) -> HybridSearch {
        HybridSearch::new(
            LexicalSearch::new(store.clone()),
            SemanticSearch::new(store, SimilarityScorer::default()),
        )
    }

    #[test]
    fn merge_puts_lexical_first_and_dedups() {
        let lexical = vec![record("onix", &["rock"], 1), record("Geodude", &["rock"], 1)];
        let semantic = vec![
            record("geodude", &["rock"], 1),
            record("golem", &["rock"], 1),
            record("onix", &["rock"], 1),
        ];

        let merged = merge_by_priority(lexical, semantic, 10);
        let merged_names: Vec<&str> = merged.iter().map(|hit| hit.record.name.as_str()).collect();
        assert_eq!(merged_names, vec!["onix", "Geodude", "golem"]);
        assert_eq!(
            merged.iter().map(|hit| hit.source).collect::<Vec<_>>(),
            vec![HitSource::Fulltext, HitSource::Fulltext, HitSource::Semantic]
        );
    }

    #[test]
    fn merge_truncates_after_fusion() {
        let lexical = vec![record("a", &[], 1), record("b", &[], 1)];
        let semantic = vec![record("c", &[], 1), record("d", &[], 1)];
        let merged = merge_by_priority(lexical, semantic, 3);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2].record.name, "c");
    }

    #[tokio::test]
    async fn lexical_hits_outrank_semantic_only_hits() {
        let search = hybrid(Arc::new(catalog().with_text_index()));
        let hits = search
            .search_with_sources("flying", &RecordFilter::new(), 10)
            .await
            .unwrap();

        let identities: HashSet<String> = hits.iter().map(|hit| hit.record.identity()).collect();
        assert_eq!(identities.len(), hits.len());

        let first_semantic = hits
            .iter()
            .position(|hit| hit.source == HitSource::Semantic)
            .unwrap_or(hits.len());
        assert!(hits[..first_semantic]
            .iter()
            .all(|hit| hit.source == HitSource::Fulltext));
        assert!(hits[first_semantic..]
            .iter()
            .all(|hit| hit.source == HitSource::Semantic));
        assert!(hits[..first_semantic]
            .iter()
            .all(|hit| hit.record.has_category("flying")));
        assert_eq!(first_semantic, 3);
    }

    #[tokio::test]
    async fn missing_index_degrades_to_semantic_results() {
        let without_index = hybrid(Arc::new(catalog()));
        let semantic_only = SemanticSearch::new(Arc::new(catalog()), SimilarityScorer::default());

        let fused = without_index.search("char", &RecordFilter::new(), 5).await.unwrap();
        let expected = semantic_only.search("char", &RecordFilter::new(), 5).await.unwrap();
        assert_eq!(names(&fused), names(&expected));
    }

    #[tokio::test]
    async fn semantic_failure_propagates() {
        let search = hybrid(Arc::new(UnavailableStore));
        let err = search.search("mew", &RecordFilter::new(), 5).await.unwrap_err();
        assert!(!err.is_index_missing());
        assert!(err.to_string().contains("connection refused"));
    }
}
