use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod filters;
pub mod query;
pub mod record;

pub use filters::{RecordFilter, StatRange};
pub use query::{Query, QueryParams, SearchMode, DEFAULT_LIMIT};
pub use record::{derive_search_text, Record, StatKind, Stats};

/// Ranked page of records returned by a search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResponse {
    pub count: usize,
    pub data: Vec<Record>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TypesResponse {
    pub types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
