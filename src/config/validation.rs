//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, depth bounded)
//! - Reject unknown log levels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ConfigValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Upper bound for `validator.max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 256;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A semantic problem in an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("validator.max_string_len must be greater than 0")]
    ZeroStringLength,

    #[error("validator.max_depth must be between 1 and {max}, got {actual}")]
    DepthOutOfRange { actual: usize, max: usize },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("storage.max_books must be greater than 0")]
    ZeroCapacity,
}

/// Check every semantic constraint and report all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if config.validator.max_string_len == 0 {
        errors.push(ConfigValidationError::ZeroStringLength);
    }

    let depth = config.validator.max_depth;
    if depth == 0 || depth > MAX_DEPTH_LIMIT {
        errors.push(ConfigValidationError::DepthOutOfRange {
            actual: depth,
            max: MAX_DEPTH_LIMIT,
        });
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.storage.max_books == 0 {
        errors.push(ConfigValidationError::ZeroCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.validator.max_string_len = 0;
        config.validator.max_depth = 1000;
        config.observability.log_level = "loud".into();
        config.storage.max_books = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::ZeroStringLength,
                ConfigValidationError::DepthOutOfRange {
                    actual: 1000,
                    max: MAX_DEPTH_LIMIT
                },
                ConfigValidationError::UnknownLogLevel("loud".into()),
                ConfigValidationError::ZeroCapacity,
            ]
        );
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = AppConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
