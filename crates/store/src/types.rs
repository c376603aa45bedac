use dex_protocol::Record;

/// A record paired with the store's native text relevance.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindSort {
    /// Catalog order.
    #[default]
    Natural,
    /// Case-insensitive name order; equal names keep catalog order.
    NameAscending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: FindSort,
    pub limit: Option<usize>,
}

impl FindOptions {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            sort: FindSort::Natural,
            limit: None,
        }
    }

    #[must_use]
    pub const fn sample(limit: usize) -> Self {
        Self {
            sort: FindSort::Natural,
            limit: Some(limit),
        }
    }

    #[must_use]
    pub const fn by_name(limit: usize) -> Self {
        Self {
            sort: FindSort::NameAscending,
            limit: Some(limit),
        }
    }
}
