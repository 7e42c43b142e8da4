//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, search bounds)
//! - Check enabled tiers have parseable URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CheckoutConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::CheckoutConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending setting.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    } else if let Err(e) = value.parse::<Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL: {}", e)));
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CheckoutConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rich = &config.providers.rich;
    if rich.enabled {
        check_url(&mut errors, "providers.rich.base_url", &rich.base_url);
        if rich.timeout_ms == 0 {
            errors.push(ValidationError::new("providers.rich.timeout_ms", "must be greater than 0"));
        }
    }

    let simple = &config.providers.simple;
    if simple.enabled {
        check_url(&mut errors, "providers.simple.countries_url", &simple.countries_url);
        check_url(&mut errors, "providers.simple.cities_url", &simple.cities_url);
        if simple.timeout_ms == 0 {
            errors.push(ValidationError::new("providers.simple.timeout_ms", "must be greater than 0"));
        }
    }

    let search = &config.search;
    if search.min_query_len == 0 {
        errors.push(ValidationError::new("search.min_query_len", "must be at least 1"));
    }
    if search.cache_prefix_len < search.min_query_len {
        errors.push(ValidationError::new(
            "search.cache_prefix_len",
            format!("must be at least min_query_len ({})", search.min_query_len),
        ));
    }
    if search.city_limit == 0 {
        errors.push(ValidationError::new("search.city_limit", "must be greater than 0"));
    }

    if config.postal.synthesized_count == 0 {
        errors.push(ValidationError::new("postal.synthesized_count", "must be greater than 0"));
    }

    let breaker = &config.resilience;
    if breaker.enabled && breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("resilience.failure_threshold", "must be greater than 0"));
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
        assert!(validate_config(&CheckoutConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = CheckoutConfig::default();
        config.providers.rich.base_url = "not a url".to_string();
        config.providers.simple.timeout_ms = 0;
        config.search.min_query_len = 4;
        config.postal.synthesized_count = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "providers.rich.base_url",
                "providers.simple.timeout_ms",
                "search.cache_prefix_len",
                "postal.synthesized_count",
            ]
        );
    }

    #[test]
    fn test_disabled_tier_is_not_checked() {
        let mut config = CheckoutConfig::default();
        config.providers.rich.enabled = false;
        config.providers.rich.base_url = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
