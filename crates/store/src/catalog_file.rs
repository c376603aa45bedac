use crate::error::{Result, StoreError};
use dex_protocol::Record;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// On-disk catalog: `{ "schema_version": 1, "records": [...] }`.
/// A bare JSON array of records is accepted on load as well.
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCatalog {
    schema_version: u32,
    records: Vec<Record>,
}

impl CatalogFile {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if value.is_array() {
            let records: Vec<Record> = serde_json::from_value(value)?;
            return Ok(Self { records });
        }

        let persisted: PersistedCatalog = serde_json::from_value(value)?;
        if persisted.schema_version != CATALOG_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: persisted.schema_version,
                expected: CATALOG_SCHEMA_VERSION,
            });
        }
        Ok(Self {
            records: persisted.records,
        })
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let persisted = PersistedCatalog {
            schema_version: CATALOG_SCHEMA_VERSION,
            records: self.records.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
