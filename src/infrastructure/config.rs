use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DEFAULT_PREVIEW_LEN};

pub const CONFIG_PATH_VAR: &str = "DIRECTORY_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub seed: SeedConfig,
}

/// Which persisted shape the MongoDB adapter reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreLayout {
    #[default]
    Embedded,
    Normalized,
}

impl std::str::FromStr for StoreLayout {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" => Ok(Self::Embedded),
            "normalized" => Ok(Self::Normalized),
            other => Err(DomainError::invalid_argument(format!(
                "unknown store layout {other:?}, expected embedded or normalized"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub layout: StoreLayout,
    pub operation_timeout_ms: u64,
    pub preview_len: usize,
}

impl StoreConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "micro-appoint-companies".to_string(),
            layout: StoreLayout::Embedded,
            operation_timeout_ms: 5000,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub companies: usize,
    pub services_per_company: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            companies: 3,
            services_per_company: 12,
        }
    }
}

impl AppConfig {
    /// Reads the YAML file named by `DIRECTORY_CONFIG` when set, then applies
    /// environment overrides.
    pub fn load() -> Result<Self, DomainError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::invalid_argument(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(raw)
            .map_err(|e| DomainError::invalid_argument(format!("invalid config: {e}")))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.store.uri = uri;
        }
        if let Some(database) = lookup("MONGODB_DATABASE") {
            self.store.database = database;
        }
        if let Some(layout) = lookup("STORE_LAYOUT") {
            self.store.layout = layout.parse()?;
        }
        if let Some(ms) = lookup("STORE_OPERATION_TIMEOUT_MS") {
            self.store.operation_timeout_ms = parse_number("STORE_OPERATION_TIMEOUT_MS", &ms)?;
        }
        if let Some(len) = lookup("SERVICE_PREVIEW_LEN") {
            self.store.preview_len = parse_number("SERVICE_PREVIEW_LEN", &len)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::invalid_argument(format!("{key} must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.uri, "mongodb://localhost:27017");
        assert_eq!(config.store.database, "micro-appoint-companies");
        assert_eq!(config.store.layout, StoreLayout::Embedded);
        assert_eq!(config.store.operation_timeout(), Duration::from_secs(5));
        assert_eq!(config.store.preview_len, 10);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            "store:\n  layout: normalized\n  database: directory-test\nseed:\n  companies: 1\n",
        )
        .unwrap();

        assert_eq!(config.store.layout, StoreLayout::Normalized);
        assert_eq!(config.store.database, "directory-test");
        assert_eq!(config.store.uri, "mongodb://localhost:27017");
        assert_eq!(config.seed.companies, 1);
        assert_eq!(config.seed.services_per_company, 12);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MONGODB_URI", "mongodb://db:27017"),
            ("STORE_LAYOUT", "Normalized"),
            ("STORE_OPERATION_TIMEOUT_MS", "250"),
            ("SERVICE_PREVIEW_LEN", "3"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.store.uri, "mongodb://db:27017");
        assert_eq!(config.store.layout, StoreLayout::Normalized);
        assert_eq!(config.store.operation_timeout(), Duration::from_millis(250));
        assert_eq!(config.store.preview_len, 3);
        assert_eq!(config.store.database, "micro-appoint-companies");
    }

    #[test]
    fn test_bad_overrides_are_rejected() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(|key| (key == "STORE_LAYOUT").then(|| "sharded".to_string()))
            .is_err());
        assert!(config
            .apply_overrides(|key| (key == "SERVICE_PREVIEW_LEN").then(|| "ten".to_string()))
            .is_err());
    }
}
