use std::path::PathBuf;

use catalogdb_core::ConfigError;
use thiserror::Error;

/// Errors returned by the Google Sheets publisher.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A credentials or token file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The client-secrets file is not a usable OAuth client definition.
    #[error("invalid OAuth client secrets in {}: {reason}", .path.display())]
    InvalidCredentials { path: PathBuf, reason: String },

    /// The OAuth consent or token exchange did not yield a token.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
