//! # Dex Search
//!
//! Hybrid search core over a creature catalog.
//!
//! - **Similarity scoring**: edit distance, similarity ratio and a composite
//!   five-channel score
//! - **Lexical path**: store-backed indexed text search
//! - **Semantic path**: fuzzy ranking over a candidate sample
//! - **Hybrid**: both paths run concurrently, merged lexical-first
//! - **Planner**: blank text turns any query into a filter-only listing

mod engine;
mod error;
mod hybrid;
mod lexical;
mod planner;
mod profile;
mod semantic;
mod similarity;
#[cfg(test)]
mod test_support;

pub use engine::{ExplainedHit, SearchEngine};
pub use error::{Result, SearchError};
pub use hybrid::{merge_by_priority, HitSource, HybridSearch, MergedHit};
pub use lexical::LexicalSearch;
pub use planner::{build_filter, plan, SearchPlan};
pub use profile::ScoringProfile;
pub use semantic::{SemanticSearch, OVERSAMPLE_FACTOR};
pub use similarity::{levenshtein, similarity_ratio, ScoreWeights, SimilarityScorer};
