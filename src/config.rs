//! Runtime configuration shared by the CLI and the registry client

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str = "https://api.premid.app/v3";
pub const DEFAULT_SCHEMA_URL: &str = "https://schemas.premid.app/metadata/1.10";
pub const DEFAULT_CATALOG_DIR: &str = "websites";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Version every presence must start at when it has never been published.
pub const INITIAL_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct LintConfig {
    /// GraphQL endpoint of the presence registry.
    pub registry_url: Url,
    /// Location of the current metadata JSON Schema.
    pub schema_url: Url,
    /// Directory holding `<group>/<presence>/metadata.json` entries.
    pub catalog_dir: PathBuf,
    pub timeout_secs: u64,
}

impl LintConfig {
    pub fn new(
        registry_url: &str,
        schema_url: &str,
        catalog_dir: impl Into<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: parse_url("registry URL", registry_url)?,
            schema_url: parse_url("schema URL", schema_url)?,
            catalog_dir: catalog_dir.into(),
            timeout_secs,
        })
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            registry_url: Url::parse(DEFAULT_REGISTRY_URL).expect("default registry URL is valid"),
            schema_url: Url::parse(DEFAULT_SCHEMA_URL).expect("default schema URL is valid"),
            catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}
