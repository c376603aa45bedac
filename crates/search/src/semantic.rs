use crate::error::Result;
use crate::similarity::SimilarityScorer;
use dex_protocol::{Record, RecordFilter};
use dex_store::{CatalogStore, FindOptions};
use std::sync::Arc;

/// Candidate sample size per requested result when no filter narrows the catalog.
pub const OVERSAMPLE_FACTOR: usize = 10;

/// Fuzzy ranking over a candidate set pulled from the store.
#[derive(Clone)]
pub struct SemanticSearch {
    store: Arc<dyn CatalogStore>,
    scorer: SimilarityScorer,
}

impl SemanticSearch {
    pub fn new(store: Arc<dyn CatalogStore>, scorer: SimilarityScorer) -> Self {
        Self { store, scorer }
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub async fn search(&self, text: &str, filter: &RecordFilter, limit: usize) -> Result<Vec<Record>> {
        Ok(self
            .search_scored(text, filter, limit)
            .await?
            .into_iter()
            .map(|(record, _)| record)
            .collect())
    }

    /// Like [`SemanticSearch::search`] but keeps each record's score.
    pub async fn search_scored(
        &self,
        text: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<(Record, f64)>> {
        // A filter means "rank everything that matches"; otherwise sample.
        let options = if filter.is_empty() {
            FindOptions::sample(limit.saturating_mul(OVERSAMPLE_FACTOR))
        } else {
            FindOptions::all()
        };
        let candidates = self.store.find(filter, options).await?;
        let candidate_count = candidates.len();

        let mut scored: Vec<(Record, f64)> = candidates
            .into_iter()
            .map(|record| {
                let score = self.scorer.score(text, &record);
                (record, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Stable: equal scores keep retrieval order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        log::debug!(
            "Semantic: {} candidates, {} results",
            candidate_count,
            scored.len()
        );
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, names, record};
    use dex_protocol::{StatKind, StatRange};
    use dex_store::MemoryCatalog;
    use pretty_assertions::assert_eq;

    fn semantic(catalog: MemoryCatalog) -> SemanticSearch {
        SemanticSearch::new(Arc::new(catalog), SimilarityScorer::default())
    }

    #[tokio::test]
    async fn prefix_family_ranks_first() {
        let results = semantic(catalog())
            .search("char", &RecordFilter::new(), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);

        let mut top: Vec<&str> = names(&results)[..3].to_vec();
        top.sort_unstable();
        assert_eq!(top, vec!["charizard", "charmander", "charmeleon"]);
    }

    #[tokio::test]
    async fn scores_are_descending_and_positive() {
        let scored = semantic(catalog())
            .search_scored("water turtle", &RecordFilter::new(), 20)
            .await
            .unwrap();
        assert!(!scored.is_empty());
        assert!(scored.iter().all(|(_, score)| *score > 0.0));
        assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[tokio::test]
    async fn unfiltered_search_only_samples_limit_times_ten() {
        // 12 decoys precede the only close match; limit 1 samples 10 records.
        let mut records: Vec<_> = (0..12).map(|i| record(&format!("zz{i:02}"), &["rock"], 10)).collect();
        records.push(record("pikachu", &["electric"], 55));
        let search = semantic(MemoryCatalog::new(records).unwrap());

        let results = search.search("pikachu", &RecordFilter::new(), 1).await.unwrap();
        assert_ne!(names(&results), vec!["pikachu"]);

        let filter = RecordFilter::new().category("electric");
        let results = search.search("pikachu", &filter, 1).await.unwrap();
        assert_eq!(names(&results), vec!["pikachu"]);
    }

    #[tokio::test]
    async fn filtered_search_scans_every_match() {
        let filter = RecordFilter::new().stat(StatKind::Power, StatRange::at_least(100));
        let results = semantic(catalog()).search("fire", &filter, 20).await.unwrap();
        assert!(names(&results).contains(&"arcanine"));
        assert!(results.iter().all(|r| r.stats.power >= 100));
    }

    #[tokio::test]
    async fn ties_keep_retrieval_order() {
        // Every "?x" name scores identically against "x".
        let records = vec![record("cx", &[], 1), record("ax", &[], 1), record("bx", &[], 1)];
        let results = semantic(MemoryCatalog::new(records).unwrap())
            .search("x", &RecordFilter::new(), 3)
            .await
            .unwrap();
        assert_eq!(names(&results), vec!["cx", "ax", "bx"]);
    }
}
