//! Google Sheets publishing for catalog deliverables.

pub mod auth;
pub mod client;
pub mod error;
mod redirect;
pub(crate) mod types;

use std::path::PathBuf;

use catalogdb_core::AppConfig;

pub use auth::{Authenticator, ClientSecrets, StoredToken, SPREADSHEETS_SCOPE};
pub use client::{to_value_rows, SheetsClient};
pub use error::SheetsError;
pub use types::UpdateValuesResponse;

/// Settings needed to authorize and talk to the Sheets API.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub timeout_secs: u64,
}

impl SheetsConfig {
    /// # Errors
    ///
    /// Returns [`SheetsError::Config`] if `GOOGLE_SHEETS_CREDENTIALS` is unset.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        Ok(Self {
            credentials_path: config.require_sheets_credentials_path()?.to_path_buf(),
            token_path: config.sheets_token_path.clone(),
            timeout_secs: config.http_timeout_secs,
        })
    }

    /// Builds an [`Authenticator`] from the client-secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Io`] or [`SheetsError::InvalidCredentials`] if
    /// the secrets file is unreadable, or [`SheetsError::Http`] if the HTTP
    /// client cannot be built.
    pub fn authenticator(&self) -> Result<Authenticator, SheetsError> {
        let secrets = ClientSecrets::load(&self.credentials_path)?;
        Authenticator::new(secrets, self.token_path.clone(), self.timeout_secs)
    }
}

/// Authorizes (reusing the token cache when possible) and returns a client.
///
/// # Errors
///
/// Propagates credential, token, and client-construction failures.
pub async fn connect(config: &SheetsConfig) -> Result<SheetsClient, SheetsError> {
    let token = config.authenticator()?.access_token().await?;
    SheetsClient::new(&token, config.timeout_secs)
}
