use dex_protocol::{Query, RecordFilter, SearchMode, StatKind};
use std::fmt;

/// Structural constraints of a query; an absent bound leaves that side open.
#[must_use]
pub fn build_filter(query: &Query) -> RecordFilter {
    let mut filter = RecordFilter::new()
        .stat(StatKind::Power, query.power)
        .stat(StatKind::Resilience, query.resilience)
        .stat(StatKind::Hp, query.hp)
        .stat(StatKind::Speed, query.speed);
    if let Some(category) = &query.category {
        filter = filter.category(category.as_str());
    }
    filter
}

/// Which path(s) a query runs through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// No usable text: filter matches sorted by name.
    FilterOnly,
    /// Lexical, falling back to semantic when the lexical path fails.
    Fulltext(String),
    Semantic(String),
    /// Both paths, merged lexical-first.
    Hybrid(String),
}

impl SearchPlan {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            SearchPlan::FilterOnly => "filter",
            SearchPlan::Fulltext(_) => "fulltext",
            SearchPlan::Semantic(_) => "semantic",
            SearchPlan::Hybrid(_) => "hybrid",
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            SearchPlan::FilterOnly => None,
            SearchPlan::Fulltext(text) | SearchPlan::Semantic(text) | SearchPlan::Hybrid(text) => {
                Some(text.as_str())
            }
        }
    }
}

impl fmt::Display for SearchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{}({text:?})", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

/// Blank text wins over the requested mode.
#[must_use]
pub fn plan(query: &Query) -> SearchPlan {
    let Some(text) = query.trimmed_text() else {
        return SearchPlan::FilterOnly;
    };
    let text = text.to_string();
    match query.mode {
        SearchMode::Fulltext => SearchPlan::Fulltext(text),
        SearchMode::Semantic => SearchPlan::Semantic(text),
        SearchMode::Hybrid => SearchPlan::Hybrid(text),
    }
}
