use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let listing_base_url = require("VITRINE_LISTING_BASE_URL")?;

    let env = parse_environment(&or_default("VITRINE_ENV", "development"));
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");
    let user_agent = or_default("VITRINE_USER_AGENT", "vitrine/0.1 (catalog-client)");

    let request_timeout_secs = parse_u64("VITRINE_REQUEST_TIMEOUT_SECS", "30")?;
    let page_size = parse_u32("VITRINE_PAGE_SIZE", "12")?;
    let search_debounce_ms = parse_u64("VITRINE_SEARCH_DEBOUNCE_MS", "300")?;
    let max_retries = parse_u32("VITRINE_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("VITRINE_RETRY_BACKOFF_BASE_MS", "1000")?;

    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VITRINE_PAGE_SIZE".to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        listing_base_url,
        user_agent,
        request_timeout_secs,
        page_size,
        search_debounce_ms,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("VITRINE_LISTING_BASE_URL", "https://shop.example.com/api");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_listing_base_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VITRINE_LISTING_BASE_URL"),
            "expected MissingEnvVar(VITRINE_LISTING_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.listing_base_url, "https://shop.example.com/api");
        assert_eq!(cfg.user_agent, "vitrine/0.1 (catalog-client)");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.search_debounce_ms, 300);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_ms, 1000);
    }

    #[test]
    fn build_app_config_honors_overrides() {
        let mut map = full_env();
        map.insert("VITRINE_ENV", "production");
        map.insert("VITRINE_PAGE_SIZE", "48");
        map.insert("VITRINE_SEARCH_DEBOUNCE_MS", "150");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.page_size, 48);
        assert_eq!(cfg.search_debounce_ms, 150);
    }

    #[test]
    fn build_app_config_rejects_non_numeric_page_size() {
        let mut map = full_env();
        map.insert("VITRINE_PAGE_SIZE", "a-dozen");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_PAGE_SIZE"),
            "expected InvalidEnvVar(VITRINE_PAGE_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_page_size() {
        let mut map = full_env();
        map.insert("VITRINE_PAGE_SIZE", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_PAGE_SIZE"),
            "expected InvalidEnvVar(VITRINE_PAGE_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_debounce() {
        let mut map = full_env();
        map.insert("VITRINE_SEARCH_DEBOUNCE_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_SEARCH_DEBOUNCE_MS"),
            "expected InvalidEnvVar(VITRINE_SEARCH_DEBOUNCE_MS), got: {result:?}"
        );
    }
}
