//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Storage configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Storage configuration for whichever backend the ledger is wired to.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Connection URL of the document store. Ignored by the in-memory store.
    #[serde(default = "default_store_url")]
    pub url: String,
    /// Logical database name.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_url() -> String {
    "memory://".to_string()
}

fn default_store_name() -> String {
    "tally".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            name: default_store_name(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_sources() {
        let config: AppConfig = config::Config::builder()
            .set_override("store.url", "memory://")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.store.url, "memory://");
        assert_eq!(config.store.name, "tally");
    }
}
