//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::validation::rules::DEFAULT_MAX_STRING_LEN;

/// Root configuration for the books service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Record validator limits.
    pub validator: ValidatorConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Book store settings.
    pub storage: StorageConfig,
}

/// Record validator configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum length of title, genre and author, in UTF-8 bytes.
    pub max_string_len: usize,

    /// Maximum nesting of compound values inside a record.
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: 32,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per event, for production.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Install a Prometheus recorder and print it after each command.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
        }
    }
}

/// Book store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum number of books held by the in-memory store.
    pub max_books: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { max_books: 10_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.validator.max_string_len, 100);
        assert_eq!(config.validator.max_depth, 32);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert_eq!(config.storage.max_books, 10_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [validator]
            max_string_len = 64

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.validator.max_string_len, 64);
        assert_eq!(config.validator.max_depth, 32);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
