//! Shared fixtures for unit tests.

use async_trait::async_trait;
use dex_protocol::{Record, RecordFilter, Stats};
use dex_store::{CatalogStore, FindOptions, MemoryCatalog, ScoredRecord, StoreError};

pub(crate) fn record(name: &str, categories: &[&str], power: u32) -> Record {
    Record::new(
        name,
        10.0,
        100.0,
        categories.iter().map(|c| c.to_string()).collect(),
        Stats::new(60, power, 60, 60),
    )
}

pub(crate) fn records() -> Vec<Record> {
    vec![
        record("bulbasaur", &["grass", "poison"], 49),
        record("ivysaur", &["grass", "poison"], 62),
        record("charmander", &["fire"], 52),
        record("charmeleon", &["fire"], 64),
        record("charizard", &["fire", "flying"], 84),
        record("squirtle", &["water"], 48),
        record("wartortle", &["water"], 63),
        record("blastoise", &["water"], 83),
        record("pikachu", &["electric"], 55),
        record("raichu", &["electric"], 90),
        record("machamp", &["fighting"], 130),
        record("arcanine", &["fire"], 110),
        record("gyarados", &["water", "flying"], 125),
        record("onix", &["rock", "ground"], 45),
        record("snorlax", &["normal"], 110),
        record("dragonite", &["dragon", "flying"], 134),
        record("mewtwo", &["psychic"], 110),
        record("mew", &["psychic"], 100),
    ]
}

pub(crate) fn catalog() -> MemoryCatalog {
    MemoryCatalog::new(records()).expect("fixture names are unique")
}

pub(crate) fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

/// Store whose every call fails as if the backend were unreachable.
pub(crate) struct UnavailableStore;

#[async_trait]
impl CatalogStore for UnavailableStore {
    async fn text_search(
        &self,
        _text: &str,
        _filter: &RecordFilter,
        _limit: usize,
    ) -> dex_store::Result<Vec<ScoredRecord>> {
        Err(StoreError::Other("connection refused".to_string()))
    }

    async fn find(
        &self,
        _filter: &RecordFilter,
        _options: FindOptions,
    ) -> dex_store::Result<Vec<Record>> {
        Err(StoreError::Other("connection refused".to_string()))
    }

    async fn all_categories(&self) -> dex_store::Result<Vec<String>> {
        Err(StoreError::Other("connection refused".to_string()))
    }
}
