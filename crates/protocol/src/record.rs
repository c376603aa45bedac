use serde::{Deserialize, Serialize};

/// A single creature entry of the catalog.
///
/// Wire names follow the upstream feed (`types`, `stats.attack`, `searchText`);
/// the domain names are accepted as aliases when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(rename = "types", alias = "categories", default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}

impl Record {
    /// Build a record the way ingestion does, deriving `search_text` from the
    /// name and categories.
    pub fn new(
        name: impl Into<String>,
        height: f64,
        weight: f64,
        categories: Vec<String>,
        stats: Stats,
    ) -> Self {
        let name = name.into();
        let search_text = derive_search_text(&name, &categories);
        Self {
            name,
            height,
            weight,
            categories,
            stats,
            search_text: Some(search_text),
        }
    }

    /// Identity key used for deduplication and uniqueness checks.
    #[must_use]
    pub fn identity(&self) -> String {
        self.name.to_lowercase()
    }

    /// Precomputed search text, or an empty string when the record carries none.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.search_text.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        let category = category.to_lowercase();
        self.categories
            .iter()
            .any(|c| c.to_lowercase() == category)
    }
}

#[must_use]
pub fn derive_search_text(name: &str, categories: &[String]) -> String {
    let mut text = name.to_string();
    for category in categories {
        text.push(' ');
        text.push_str(category);
    }
    text
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub hp: u32,
    #[serde(rename = "attack", alias = "power", default)]
    pub power: u32,
    #[serde(rename = "defense", alias = "resilience", default)]
    pub resilience: u32,
    #[serde(default)]
    pub speed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Hp,
    Power,
    Resilience,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::Hp,
        StatKind::Power,
        StatKind::Resilience,
        StatKind::Speed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StatKind::Hp => "hp",
            StatKind::Power => "attack",
            StatKind::Resilience => "defense",
            StatKind::Speed => "speed",
        }
    }
}

impl Stats {
    #[must_use]
    pub const fn new(hp: u32, power: u32, resilience: u32, speed: u32) -> Self {
        Self {
            hp,
            power,
            resilience,
            speed,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Power => self.power,
            StatKind::Resilience => self.resilience,
            StatKind::Speed => self.speed,
        }
    }
}
