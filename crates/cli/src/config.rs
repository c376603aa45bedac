use anyhow::{Context as AnyhowContext, Result};
use dex_search::{ScoringProfile, SearchEngine};
use dex_store::MemoryCatalog;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) const CATALOG_ENV: &str = "DEX_CATALOG";
pub(crate) const PROFILE_ENV: &str = "DEX_PROFILE";
pub(crate) const TEXT_INDEX_ENV: &str = "DEX_TEXT_INDEX";
const DEFAULT_CATALOG: &str = "catalog.json";

/// Where the catalog lives and how to score it. Flags win over environment.
#[derive(Debug, Clone)]
pub(crate) struct EngineConfig {
    pub catalog: PathBuf,
    pub profile: Option<PathBuf>,
    pub text_index: bool,
}

impl EngineConfig {
    pub(crate) fn resolve(
        catalog: Option<PathBuf>,
        profile: Option<PathBuf>,
        no_text_index: bool,
    ) -> Self {
        let catalog = catalog
            .or_else(|| env::var_os(CATALOG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));
        let profile = profile.or_else(|| {
            env::var_os(PROFILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        let text_index = !no_text_index && !env_falsey(TEXT_INDEX_ENV);

        Self {
            catalog,
            profile,
            text_index,
        }
    }

    pub(crate) fn load_profile(&self) -> Result<ScoringProfile> {
        let Some(path) = &self.profile else {
            return Ok(ScoringProfile::default());
        };
        if let Some(builtin) = path.to_str().and_then(ScoringProfile::builtin) {
            return Ok(builtin);
        }
        ScoringProfile::from_file(path)
    }

    pub(crate) async fn open(&self) -> Result<OpenEngine> {
        let profile = self.load_profile()?;
        let catalog = MemoryCatalog::load(&self.catalog, self.text_index)
            .await
            .with_context(|| format!("Failed to load catalog {}", self.catalog.display()))?;
        let records = catalog.len();
        log::info!(
            "Catalog {} loaded: {} records, text index {}, profile '{}'",
            self.catalog.display(),
            records,
            if self.text_index { "on" } else { "off" },
            profile.name()
        );
        if let Some(description) = profile.description() {
            log::debug!("Profile '{}': {description}", profile.name());
        }

        Ok(OpenEngine {
            engine: SearchEngine::new(Arc::new(catalog), *profile.weights()),
            records,
        })
    }
}

pub(crate) struct OpenEngine {
    pub engine: SearchEngine,
    pub records: usize,
}

fn env_falsey(var: &str) -> bool {
    env::var(var)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(false)
}
