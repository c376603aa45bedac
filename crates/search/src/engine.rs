use crate::error::{Result, SearchError};
use crate::hybrid::{HitSource, HybridSearch, MergedHit};
use crate::lexical::LexicalSearch;
use crate::planner::{build_filter, plan, SearchPlan};
use crate::semantic::SemanticSearch;
use crate::similarity::{ScoreWeights, SimilarityScorer};
use dex_protocol::{Query, Record, RecordFilter, SearchResponse};
use dex_store::{CatalogStore, FindOptions};
use serde::Serialize;
use std::sync::Arc;

/// A result together with the path that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedHit {
    pub record: Record,
    pub source: HitSource,
    /// Composite similarity of the query text to the record; absent for filter-only queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Entry point of the search core: plans a [`Query`] and runs it against a store.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn CatalogStore>,
    hybrid: HybridSearch,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn CatalogStore>, weights: ScoreWeights) -> Self {
        let lexical = LexicalSearch::new(store.clone());
        let semantic = SemanticSearch::new(store.clone(), SimilarityScorer::new(weights));
        Self {
            store,
            hybrid: HybridSearch::new(lexical, semantic),
        }
    }

    pub async fn search(&self, query: &Query) -> Result<SearchResponse> {
        let (_, hits) = self.execute(query).await?;
        Ok(SearchResponse::new(
            hits.into_iter().map(|hit| hit.record).collect(),
        ))
    }

    /// Same results as [`SearchEngine::search`], annotated for diagnostics.
    pub async fn search_explained(&self, query: &Query) -> Result<Vec<ExplainedHit>> {
        let (plan, hits) = self.execute(query).await?;
        let scorer = self.hybrid.semantic().scorer();

        Ok(hits
            .into_iter()
            .map(|hit| ExplainedHit {
                similarity: plan.text().map(|text| scorer.score(text, &hit.record)),
                record: hit.record,
                source: hit.source,
            })
            .collect())
    }

    /// Distinct categories across the catalog, sorted ascending.
    pub async fn types(&self) -> Result<Vec<String>> {
        let types = self.store.all_categories().await?;
        log::debug!("Types: {} categories", types.len());
        Ok(types)
    }

    async fn execute(&self, query: &Query) -> Result<(SearchPlan, Vec<MergedHit>)> {
        if query.limit == 0 {
            return Err(SearchError::InvalidLimit);
        }

        let filter = build_filter(query);
        let plan = plan(query);
        let limit = query.limit;

        let hits = match &plan {
            SearchPlan::FilterOnly => self.filter_only(&filter, limit).await?,
            SearchPlan::Fulltext(text) => self.fulltext(text, &filter, limit).await?,
            SearchPlan::Semantic(text) => tag(
                self.hybrid.semantic().search(text, &filter, limit).await?,
                HitSource::Semantic,
            ),
            SearchPlan::Hybrid(text) => {
                self.hybrid
                    .search_with_sources(text, &filter, limit)
                    .await?
            }
        };

        log::debug!(
            "Search plan={} mode={} filtered={} results={}",
            plan,
            query.mode,
            !filter.is_empty(),
            hits.len()
        );
        Ok((plan, hits))
    }

    async fn filter_only(&self, filter: &RecordFilter, limit: usize) -> Result<Vec<MergedHit>> {
        let records = self.store.find(filter, FindOptions::by_name(limit)).await?;
        Ok(tag(records, HitSource::Filter))
    }

    async fn fulltext(&self, text: &str, filter: &RecordFilter, limit: usize) -> Result<Vec<MergedHit>> {
        match self.hybrid.lexical().search(text, filter, limit).await {
            Ok(records) => Ok(tag(records, HitSource::Fulltext)),
            Err(err) => {
                if err.is_index_missing() {
                    log::warn!("Text index unavailable, using semantic search");
                } else {
                    log::warn!("Lexical search failed, using semantic search: {err}");
                }
                let records = self.hybrid.semantic().search(text, filter, limit).await?;
                Ok(tag(records, HitSource::Semantic))
            }
        }
    }
}

fn tag(records: Vec<Record>, source: HitSource) -> Vec<MergedHit> {
    records
        .into_iter()
        .map(|record| MergedHit { record, source })
        .collect()
}
