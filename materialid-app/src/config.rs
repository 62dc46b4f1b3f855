use anyhow::{Context, Result};
use materialid_core::{Taxonomy, TaxonomyStore};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const DEFAULT_LOG_FILTER: &str = "materialid=info";
pub const DEFAULT_OUTPUT_DIR: &str = "./data/runs";

/// Settings read from `materialid.yaml`. Every field is optional; command-line
/// flags take precedence over file values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Taxonomy file or directory. `None` means the bundled taxonomy.
    pub taxonomy_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            taxonomy_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {}", path.display()))
    }

    pub fn with_overrides(mut self, taxonomy_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if taxonomy_path.is_some() {
            self.taxonomy_path = taxonomy_path;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    /// Builds the store the host classifies against.
    pub fn taxonomy_store(&self) -> Result<TaxonomyStore> {
        match &self.taxonomy_path {
            Some(path) => {
                let store = TaxonomyStore::empty();
                store
                    .load(path)
                    .with_context(|| format!("Failed to load taxonomy from {}", path.display()))?;
                Ok(store)
            }
            None => {
                let taxonomy = Taxonomy::bundled().context("Bundled taxonomy failed validation")?;
                info!("Using bundled taxonomy ({} materials)", taxonomy.len());
                Ok(TaxonomyStore::with_taxonomy(taxonomy))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.taxonomy_path.is_none());
    }

    #[test]
    fn test_flags_override_file_values() {
        let config: AppConfig = serde_yaml::from_str("taxonomy_path: shop.yaml\noutput_dir: out\n").unwrap();
        let config = config.with_overrides(Some(PathBuf::from("other.yaml")), None);
        assert_eq!(config.taxonomy_path, Some(PathBuf::from("other.yaml")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<AppConfig>("taxonomy: x\n").is_err());
    }

    #[test]
    fn test_bundled_store_is_available() {
        let store = AppConfig::default().taxonomy_store().unwrap();
        assert!(store.is_available());
    }
}
