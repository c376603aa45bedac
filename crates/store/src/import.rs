//! Offline conversion of an upstream creature feed into catalog records.
//!
//! The feed is a JSON array of detail documents shaped like
//! `{ name, height, weight, types: [{ type: { name } }], stats: [{ base_stat, stat: { name } }] }`.

use crate::error::Result;
use dex_protocol::{Record, StatKind, Stats};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FeedEntry {
    name: String,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    types: Vec<FeedType>,
    #[serde(default)]
    stats: Vec<FeedStat>,
}

#[derive(Debug, Deserialize)]
struct FeedType {
    #[serde(rename = "type")]
    kind: NamedRef,
}

#[derive(Debug, Deserialize)]
struct FeedStat {
    base_stat: u32,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Convert raw feed documents. Entries that do not parse, or that repeat an
/// earlier name, are skipped and counted.
pub fn records_from_feed(entries: Vec<serde_json::Value>) -> ImportReport {
    let mut report = ImportReport::default();
    let mut seen = HashSet::new();

    for (idx, raw) in entries.into_iter().enumerate() {
        let entry: FeedEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping feed entry #{idx}: {err}");
                report.skipped += 1;
                continue;
            }
        };

        if entry.name.trim().is_empty() {
            log::warn!("Skipping feed entry #{idx}: empty name");
            report.skipped += 1;
            continue;
        }
        if !seen.insert(entry.name.to_lowercase()) {
            log::warn!("Skipping feed entry #{idx}: duplicate name {}", entry.name);
            report.skipped += 1;
            continue;
        }

        report.records.push(entry.into_record());
    }

    log::info!(
        "Imported {} records ({} skipped)",
        report.records.len(),
        report.skipped
    );
    report
}

pub async fn import_feed(path: impl AsRef<Path>) -> Result<ImportReport> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let entries: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;
    Ok(records_from_feed(entries))
}

impl FeedEntry {
    fn into_record(self) -> Record {
        let base = |stat: &str| {
            self.stats
                .iter()
                .find(|s| s.stat.name == stat)
                .map_or(0, |s| s.base_stat)
        };
        let [hp, power, resilience, speed] = StatKind::ALL.map(|kind| base(kind.as_str()));
        let stats = Stats::new(hp, power, resilience, speed);
        let categories = self.types.into_iter().map(|t| t.kind.name).collect();

        Record::new(self.name, self.height, self.weight, categories, stats)
    }
}
