use crate::record::{Record, StatKind};
use serde::{Deserialize, Serialize};

/// Inclusive bounds over one stat. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl StatRange {
    #[must_use]
    pub const fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn at_least(min: u32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    #[must_use]
    pub const fn at_most(max: u32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Structural predicate shared by every search path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<(StatKind, StatRange)>,
}

impl RecordFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Constrain one stat. Unbounded ranges are dropped; a repeated stat
    /// replaces the earlier range.
    #[must_use]
    pub fn stat(mut self, kind: StatKind, range: StatRange) -> Self {
        self.stats.retain(|(k, _)| *k != kind);
        if !range.is_unbounded() {
            self.stats.push((kind, range));
        }
        self
    }

    /// `true` when no structural constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.stats.is_empty()
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(category) = self.category.as_deref() {
            if !record.has_category(category) {
                return false;
            }
        }

        self.stats
            .iter()
            .all(|(kind, range)| range.contains(record.stats.get(*kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Stats;

    fn record(name: &str, categories: &[&str], stats: Stats) -> Record {
        Record::new(
            name,
            1.0,
            1.0,
            categories.iter().map(|c| c.to_string()).collect(),
            stats,
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("mew", &["psychic"], Stats::default())));
    }

    #[test]
    fn category_is_exact_but_case_insensitive() {
        let filter = RecordFilter::new().category("Fire");
        assert!(!filter.is_empty());
        assert!(filter.matches(&record("vulpix", &["fire"], Stats::default())));
        assert!(!filter.matches(&record("poliwag", &["water"], Stats::default())));
        assert!(!filter.matches(&record("fir", &["fir"], Stats::default())));
    }

    #[test]
    fn blank_category_does_not_activate_filter() {
        let filter = RecordFilter::new().category("   ");
        assert!(filter.is_empty());
    }

    #[test]
    fn stat_bounds_are_inclusive_and_independent() {
        let filter = RecordFilter::new()
            .stat(StatKind::Power, StatRange::at_least(100))
            .stat(StatKind::Speed, StatRange::at_most(80));

        assert!(filter.matches(&record("a", &[], Stats::new(1, 100, 1, 80))));
        assert!(!filter.matches(&record("b", &[], Stats::new(1, 99, 1, 80))));
        assert!(!filter.matches(&record("c", &[], Stats::new(1, 130, 1, 81))));
    }

    #[test]
    fn unbounded_ranges_are_dropped() {
        let filter = RecordFilter::new().stat(StatKind::Hp, StatRange::default());
        assert!(filter.is_empty());
    }

    #[test]
    fn repeated_stat_replaces_previous_range() {
        let filter = RecordFilter::new()
            .stat(StatKind::Hp, StatRange::at_least(10))
            .stat(StatKind::Hp, StatRange::new(Some(50), Some(60)));
        assert_eq!(filter.stats, vec![(StatKind::Hp, StatRange::new(Some(50), Some(60)))]);
    }
}
