use crate::filters::StatRange;
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Fulltext,
    Semantic,
    #[default]
    Hybrid,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchMode::Fulltext => "fulltext",
            SearchMode::Semantic => "semantic",
            SearchMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fulltext" => Ok(SearchMode::Fulltext),
            "semantic" => Ok(SearchMode::Semantic),
            "hybrid" => Ok(SearchMode::Hybrid),
            other => Err(anyhow!(
                "searchMode must be one of fulltext, semantic, hybrid (got {other:?})"
            )),
        }
    }
}

/// A typed search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub power: StatRange,
    #[serde(default)]
    pub resilience: StatRange,
    #[serde(default)]
    pub hp: StatRange,
    #[serde(default)]
    pub speed: StatRange,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub mode: SearchMode,
}

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            power: StatRange::default(),
            resilience: StatRange::default(),
            hp: StatRange::default(),
            speed: StatRange::default(),
            limit: DEFAULT_LIMIT,
            mode: SearchMode::default(),
        }
    }
}

impl Query {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn power(mut self, range: StatRange) -> Self {
        self.power = range;
        self
    }

    #[must_use]
    pub fn resilience(mut self, range: StatRange) -> Self {
        self.resilience = range;
        self
    }

    #[must_use]
    pub fn hp(mut self, range: StatRange) -> Self {
        self.hp = range;
        self
    }

    #[must_use]
    pub fn speed(mut self, range: StatRange) -> Self {
        self.speed = range;
        self
    }

    /// Trimmed query text, `None` when absent or blank.
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Flat parameter bag as it arrives from the outer surfaces (query string or
/// JSON payload). Every value is kept as raw text until [`QueryParams::into_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_attack: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_attack: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_defense: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_defense: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_hp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_hp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub limit: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub search_mode: Option<String>,
}

impl QueryParams {
    /// Validate the bag once and produce a typed [`Query`].
    pub fn into_query(self) -> Result<Query> {
        let power = parse_range("minAttack", &self.min_attack, "maxAttack", &self.max_attack)?;
        let resilience = parse_range(
            "minDefense",
            &self.min_defense,
            "maxDefense",
            &self.max_defense,
        )?;
        let hp = parse_range("minHp", &self.min_hp, "maxHp", &self.max_hp)?;
        let speed = parse_range("minSpeed", &self.min_speed, "maxSpeed", &self.max_speed)?;

        let limit = match non_blank(&self.limit) {
            None => DEFAULT_LIMIT,
            Some(raw) => match parse_count(raw) {
                Some(0) | None => bail!("limit must be a positive integer (got {raw:?})"),
                Some(limit) => usize::try_from(limit)
                    .map_err(|_| anyhow!("limit is too large (got {raw:?})"))?,
            },
        };

        let mode = match non_blank(&self.search_mode) {
            None => SearchMode::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(Query {
            text: self.query.filter(|text| !text.trim().is_empty()),
            category: non_blank(&self.category).map(str::to_string),
            power,
            resilience,
            hp,
            speed,
            limit,
            mode,
        })
    }
}

fn parse_range(
    min_name: &str,
    min: &Option<String>,
    max_name: &str,
    max: &Option<String>,
) -> Result<StatRange> {
    Ok(StatRange::new(
        parse_bound(min_name, min)?,
        parse_bound(max_name, max)?,
    ))
}

fn parse_bound(name: &str, raw: &Option<String>) -> Result<Option<u32>> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    let value = parse_count(raw)
        .ok_or_else(|| anyhow!("{name} must be a non-negative number (got {raw:?})"))?;
    u32::try_from(value)
        .map(Some)
        .map_err(|_| anyhow!("{name} is out of range (got {raw:?})"))
}

/// Permissive non-negative integer parsing: `"100"`, `" +100 "` and `"100.0"`
/// are all accepted, fractional or negative values are not.
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    if let Ok(value) = unsigned.parse::<u64>() {
        return Some(value);
    }
    let value = unsigned.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Accept strings, numbers and booleans alike; query strings only ever carry
/// text while JSON payloads may carry numbers.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
