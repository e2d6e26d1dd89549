//! Vehicle inventory source configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the remote stock API.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// URL returning the full stock as `{"items": [...]}`.
    pub inventory_url: String,

    /// How long a fetched snapshot stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl CatalogConfig {
    /// Cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.inventory_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl {
                field: "catalog.inventory_url",
                value: self.inventory_url.clone(),
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

fn default_cache_ttl_secs() -> u64 {
    60
}
