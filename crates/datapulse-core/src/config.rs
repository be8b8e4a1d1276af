use crate::app_config::{AppConfig, SearchBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can drive it
/// from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default))
            .ok_or_else(|| invalid(var, "expected true/false, 1/0 or yes/no".to_string()))
    };

    let log_level = or_default("DATAPULSE_LOG_LEVEL", "info");
    let keyword_catalog_path = lookup("DATAPULSE_KEYWORD_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let search_backend =
        parse_search_backend(&or_default("DATAPULSE_SEARCH_BACKEND", "google_news"))?;
    let search_base_url = lookup("DATAPULSE_SEARCH_BASE_URL")
        .ok()
        .map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty());

    let articles_per_keyword = parse_positive_usize("DATAPULSE_ARTICLES_PER_KEYWORD", "3")?;
    let request_timeout_secs = parse_u64("DATAPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("DATAPULSE_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("DATAPULSE_RETRY_BACKOFF_BASE_MS", "500")?;
    let fetch_concurrency = parse_positive_usize("DATAPULSE_FETCH_CONCURRENCY", "1")?;
    let dedupe_urls = parse_bool("DATAPULSE_DEDUPE_URLS", "false")?;
    let user_agent = or_default("DATAPULSE_USER_AGENT", "datapulse/0.1 (news-context)");
    let search_top_k = parse_positive_usize("DATAPULSE_SEARCH_TOP_K", "5")?;

    Ok(AppConfig {
        log_level,
        keyword_catalog_path,
        search_backend,
        search_base_url,
        articles_per_keyword,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        fetch_concurrency,
        dedupe_urls,
        user_agent,
        search_top_k,
    })
}

fn parse_search_backend(s: &str) -> Result<SearchBackend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "google_news" | "google" => Ok(SearchBackend::GoogleNews),
        "bing_news" | "bing" => Ok(SearchBackend::BingNews),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DATAPULSE_SEARCH_BACKEND".to_string(),
            reason: format!("unknown search backend \"{other}\""),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
