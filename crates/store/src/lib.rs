//! # Dex Store
//!
//! Read-only catalog storage consumed by the search core.
//!
//! ## Features
//!
//! - **`CatalogStore` trait**: indexed text search, filtered retrieval, category scan
//! - **In-memory catalog** with an optional inverted text index
//! - **Catalog files** with a schema version
//! - **Feed import** from upstream creature detail documents
//!
//! ## Architecture
//!
//! ```text
//! catalog.json
//!     │
//!     ├──> MemoryCatalog (records in catalog order)
//!     │      ├─> find(filter, sort, limit)
//!     │      └─> all_categories()
//!     │
//!     └──> TextIndex (optional)
//!            └─> text_search(text, filter, limit)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dex_store::{CatalogStore, MemoryCatalog};
//! use dex_protocol::RecordFilter;
//!
//! #[tokio::main]
//! async fn main() -> dex_store::Result<()> {
//!     let catalog = MemoryCatalog::load("catalog.json", true).await?;
//!
//!     for hit in catalog.text_search("fire", &RecordFilter::new(), 10).await? {
//!         println!("{}: {:.3}", hit.record.name, hit.score);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod catalog_file;
mod error;
pub mod import;
mod store;
mod text_index;
mod types;

pub use catalog_file::{CatalogFile, CATALOG_SCHEMA_VERSION};
pub use error::{Result, StoreError};
pub use store::{CatalogStore, MemoryCatalog};
pub use text_index::{tokenize, TextIndex};
pub use types::{FindOptions, FindSort, ScoredRecord};

// Re-export protocol types for convenience
pub use dex_protocol::{Record, RecordFilter, Stats};
