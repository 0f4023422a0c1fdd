use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("COLLAB_ENV", "development"));
    let log_level = or_default("COLLAB_LOG_LEVEL", "info");
    let tuning_path = lookup("COLLAB_TUNING_PATH").ok().map(PathBuf::from);
    let tei_url = lookup("COLLAB_TEI_URL")
        .ok()
        .map(|url| url.trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty());

    let embed_timeout_ms = parse_u64("COLLAB_EMBED_TIMEOUT_MS", "5000")?;
    let embed_max_retries = parse_u32("COLLAB_EMBED_MAX_RETRIES", "2")?;
    let embed_backoff_base_ms = parse_u64("COLLAB_EMBED_BACKOFF_BASE_MS", "250")?;

    let db_max_connections = parse_u32("COLLAB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("COLLAB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("COLLAB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let match_min_score = parse_u8("COLLAB_MATCH_MIN_SCORE", "0")?;
    if match_min_score > 100 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COLLAB_MATCH_MIN_SCORE".to_string(),
            reason: format!("{match_min_score} is outside 0..=100"),
        });
    }
    let match_max_matches = parse_usize("COLLAB_MATCH_MAX_MATCHES", "50")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        tuning_path,
        tei_url,
        embed_timeout_ms,
        embed_max_retries,
        embed_backoff_base_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        match_min_score,
        match_max_matches,
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
