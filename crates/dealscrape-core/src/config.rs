use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Desktop Chrome UA sent when none is configured. Marketplaces serve a bot
/// wall to obvious crawler agents.
pub const DEFAULT_SCRAPER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let database_url = lookup("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty());

    let env = parse_environment(&or_default("DEALSCRAPE_ENV", "development"))?;

    let bind_addr = parse("DEALSCRAPE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("DEALSCRAPE_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("DEALSCRAPE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DEALSCRAPE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DEALSCRAPE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs =
        parse_u64("DEALSCRAPE_SCRAPER_REQUEST_TIMEOUT_SECS", "10")?;
    if scraper_request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALSCRAPE_SCRAPER_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let scraper_user_agent =
        or_default("DEALSCRAPE_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT);
    let scraper_max_retries = parse_u32("DEALSCRAPE_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("DEALSCRAPE_SCRAPER_RETRY_BACKOFF_BASE_SECS", "1")?;
    let scraper_allowed_hosts =
        parse_host_list(&or_default("DEALSCRAPE_SCRAPER_ALLOWED_HOSTS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_allowed_hosts,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DEALSCRAPE_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

/// Split a comma-separated host list, trimming and lowercasing each entry.
fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
