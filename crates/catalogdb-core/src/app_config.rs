use std::path::PathBuf;

use crate::ConfigError;

/// Process-wide settings resolved once at startup.
///
/// Collaborator crates never read the environment themselves; they derive
/// their own typed config (`DbConfig`, `SheetsConfig`) from this struct.
#[derive(Clone)]
pub struct AppConfig {
    pub pg_host: String,
    pub pg_port: u16,
    pub pg_database: Option<String>,
    pub pg_user: Option<String>,
    pub pg_password: Option<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub sheets_credentials_path: Option<PathBuf>,
    pub sheets_token_path: PathBuf,
    pub http_timeout_secs: u64,
    pub chunk_size: usize,
    pub max_deliverables: Option<usize>,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Returns the configured database name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `PGDATABASE` when unset.
    pub fn require_pg_database(&self) -> Result<&str, ConfigError> {
        self.pg_database
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PGDATABASE".to_string()))
    }

    /// Returns the configured database user.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `PGUSER` when unset.
    pub fn require_pg_user(&self) -> Result<&str, ConfigError> {
        self.pg_user
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PGUSER".to_string()))
    }

    /// Returns the path of the Google OAuth client-secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `GOOGLE_SHEETS_CREDENTIALS`
    /// when unset.
    pub fn require_sheets_credentials_path(&self) -> Result<&PathBuf, ConfigError> {
        self.sheets_credentials_path
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_SHEETS_CREDENTIALS".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("pg_host", &self.pg_host)
            .field("pg_port", &self.pg_port)
            .field("pg_database", &self.pg_database)
            .field("pg_user", &self.pg_user)
            .field(
                "pg_password",
                &self.pg_password.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("sheets_credentials_path", &self.sheets_credentials_path)
            .field("sheets_token_path", &self.sheets_token_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("chunk_size", &self.chunk_size)
            .field("max_deliverables", &self.max_deliverables)
            .field("output_dir", &self.output_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}
