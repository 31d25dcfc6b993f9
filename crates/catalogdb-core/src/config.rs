use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let pg_host = or_default("PGHOST", "localhost");
    let pg_port = parse_u16("PGPORT", "5432")?;
    let pg_database = optional("PGDATABASE");
    let pg_user = optional("PGUSER");
    let pg_password = lookup("PGPASSWORD").ok();

    let db_max_connections = parse_u32("CATALOGDB_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("CATALOGDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let sheets_credentials_path = optional("GOOGLE_SHEETS_CREDENTIALS").map(PathBuf::from);
    let sheets_token_path = PathBuf::from(or_default("CATALOGDB_SHEETS_TOKEN_PATH", "token.json"));
    let http_timeout_secs = parse_u64("CATALOGDB_HTTP_TIMEOUT_SECS", "30")?;

    let chunk_size = parse_chunk_size(&or_default("CATALOGDB_CHUNK_SIZE", "1000"))?;
    let max_deliverables = optional("CATALOGDB_MAX_DELIVERABLES")
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|e| invalid("CATALOGDB_MAX_DELIVERABLES", e.to_string()))
        })
        .transpose()?;

    let output_dir = PathBuf::from(or_default("CATALOGDB_OUTPUT_DIR", "."));
    let log_level = or_default("CATALOGDB_LOG_LEVEL", "info");

    Ok(AppConfig {
        pg_host,
        pg_port,
        pg_database,
        pg_user,
        pg_password,
        db_max_connections,
        db_acquire_timeout_secs,
        sheets_credentials_path,
        sheets_token_path,
        http_timeout_secs,
        chunk_size,
        max_deliverables,
        output_dir,
        log_level,
    })
}

/// Parse a batch size, which must be non-zero.
fn parse_chunk_size(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "CATALOGDB_CHUNK_SIZE".to_string(),
        reason,
    };
    let value = raw.parse::<usize>().map_err(|e| invalid(e.to_string()))?;
    if value == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
