//! Google OAuth 2.0 for an installed application.
//!
//! A token is cached on disk as JSON. [`Authenticator::access_token`] reuses a
//! live cached token, refreshes an expired one, and otherwise runs the
//! loopback consent flow: a local listener on `127.0.0.1` receives the
//! authorization code from the browser redirect.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::error::SheetsError;
use crate::redirect::receive_authorization_code;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as already expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Google omits `expires_in` rarely; assume the documented one-hour lifetime.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// OAuth client definition as downloaded from the Google Cloud console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The console wraps the client under `installed` or `web`.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Reads and parses a client-secrets JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Io`] if the file cannot be read, or
    /// [`SheetsError::InvalidCredentials`] if it holds no usable client.
    pub fn load(path: &Path) -> Result<Self, SheetsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SheetsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|reason| SheetsError::InvalidCredentials {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_json(raw: &str) -> Result<Self, String> {
        let file: ClientSecretsFile = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" client".to_string())
    }
}

/// Access token plus what is needed to renew it, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// `true` while the token has more than the safety margin left at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - TimeDelta::seconds(EXPIRY_MARGIN_SECS) > now
    }

    /// Reads a cached token. A missing or unreadable cache yields `None` so the
    /// caller falls back to a fresh authorization.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read token cache");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt token cache");
                None
            }
        }
    }

    /// Writes the token cache, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SheetsError> {
        let io_err = |source: std::io::Error| SheetsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| io_err(e.into()))?;
        std::fs::write(path, json).map_err(io_err)
    }
}

/// Token endpoint response for both code exchange and refresh.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

impl TokenResponse {
    /// Google usually omits `refresh_token` on refresh; keep the previous one.
    fn into_stored(self, now: DateTime<Utc>, previous_refresh: Option<&str>) -> StoredToken {
        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        StoredToken {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_owned)),
            expires_at: now + TimeDelta::seconds(expires_in),
        }
    }
}

/// Obtains Sheets access tokens, caching them at `token_path`.
pub struct Authenticator {
    client: Client,
    secrets: ClientSecrets,
    token_path: PathBuf,
}

impl Authenticator {
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        secrets: ClientSecrets,
        token_path: PathBuf,
        timeout_secs: u64,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            secrets,
            token_path,
        })
    }

    /// Returns a usable access token, refreshing or re-authorizing as needed.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::refresh`] and
    /// [`Self::authorize_interactively`].
    pub async fn access_token(&self) -> Result<String, SheetsError> {
        let cached = StoredToken::load(&self.token_path);

        let token = match cached {
            Some(token) if token.is_valid_at(Utc::now()) => {
                tracing::debug!("using cached sheets token");
                token
            }
            Some(StoredToken {
                refresh_token: Some(refresh_token),
                ..
            }) => {
                tracing::info!("refreshing expired sheets token");
                self.refresh(&refresh_token).await?
            }
            _ => self.authorize_interactively().await?,
        };

        Ok(token.access_token)
    }

    /// Exchanges a refresh token for a new access token and caches it.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::UnexpectedStatus`] if the token endpoint rejects the request.
    /// - [`SheetsError::Http`] / [`SheetsError::Deserialize`] on transport or body errors.
    /// - [`SheetsError::Io`] if the cache cannot be written.
    pub async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, SheetsError> {
        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let response = self.request_token(&params).await?;
        let token = response.into_stored(Utc::now(), Some(refresh_token));
        token.save(&self.token_path)?;
        Ok(token)
    }

    /// Runs the loopback consent flow and caches the resulting token.
    ///
    /// Logs the consent URL, waits for the browser redirect on a local port,
    /// then exchanges the authorization code.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Authorization`] if the user denies consent or the
    ///   listener stops before a code arrives.
    /// - [`SheetsError::Io`] if the local listener fails.
    /// - Token exchange failures as for [`Self::refresh`].
    pub async fn authorize_interactively(&self) -> Result<StoredToken, SheetsError> {
        let loopback = |source: std::io::Error| SheetsError::Io {
            path: PathBuf::from("127.0.0.1 loopback listener"),
            source,
        };

        let listener = TcpListener::bind(("127.0.0.1", 0)).await.map_err(loopback)?;
        let port = listener.local_addr().map_err(loopback)?.port();
        let redirect_uri = format!("http://127.0.0.1:{port}/");
        let consent_url = self.consent_url(&redirect_uri)?;

        tracing::info!(url = %consent_url, "open this URL in a browser to authorize Google Sheets access");

        let code = receive_authorization_code(listener).await?;

        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let token = self.request_token(&params).await?.into_stored(Utc::now(), None);
        token.save(&self.token_path)?;
        tracing::info!(path = %self.token_path.display(), "saved sheets token");
        Ok(token)
    }

    /// Builds the consent screen URL for `redirect_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::InvalidBaseUrl`] if `auth_uri` is not a URL.
    pub fn consent_url(&self, redirect_uri: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.secrets.auth_uri)
            .map_err(|_| SheetsError::InvalidBaseUrl(self.secrets.auth_uri.clone()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SPREADSHEETS_SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        Ok(url)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, SheetsError> {
        let url = self.secrets.token_uri.as_str();
        let response = self.client.post(url).form(params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: "OAuth token response".to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_secrets() -> ClientSecrets {
        ClientSecrets {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "shh".to_string(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }

    #[test]
    fn client_secrets_parse_installed_client() {
        let raw = r#"{"installed": {"client_id": "abc", "client_secret": "xyz",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "redirect_uris": ["http://localhost"]}}"#;
        let secrets = ClientSecrets::from_json(raw).unwrap();
        assert_eq!(secrets.client_id, "abc");
        assert_eq!(secrets.client_secret, "xyz");
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn client_secrets_parse_web_client_with_defaults() {
        let raw = r#"{"web": {"client_id": "abc", "client_secret": "xyz"}}"#;
        let secrets = ClientSecrets::from_json(raw).unwrap();
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn client_secrets_reject_unknown_shape() {
        let err = ClientSecrets::from_json(r#"{"service_account": {}}"#).unwrap_err();
        assert!(err.contains("installed"));
    }

    #[test]
    fn client_secrets_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        let err = ClientSecrets::load(&path).unwrap_err();
        assert!(matches!(err, SheetsError::InvalidCredentials { path: ref p, .. } if p == &path));
    }

    #[test]
    fn token_validity_respects_margin() {
        let now = Utc::now();
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: now + TimeDelta::seconds(30),
        };
        assert!(!token.is_valid_at(now));

        let fresh = StoredToken {
            expires_at: now + TimeDelta::seconds(600),
            ..token
        };
        assert!(fresh.is_valid_at(now));
    }

    #[test]
    fn stored_token_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let token = StoredToken {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Utc::now(),
        };
        token.save(&path).unwrap();
        assert_eq!(StoredToken::load(&path), Some(token));
    }

    #[test]
    fn stored_token_missing_or_corrupt_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        assert!(StoredToken::load(&path).is_none());
        std::fs::write(&path, "{\"access_token\":").unwrap();
        assert!(StoredToken::load(&path).is_none());
    }

    #[test]
    fn token_response_keeps_previous_refresh_token() {
        let now = Utc::now();
        let response = TokenResponse {
            access_token: "new".to_string(),
            expires_in: Some(120),
            refresh_token: None,
        };
        let stored = response.into_stored(now, Some("old-refresh"));
        assert_eq!(stored.access_token, "new");
        assert_eq!(stored.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(stored.expires_at, now + TimeDelta::seconds(120));
    }

    #[test]
    fn token_response_defaults_lifetime() {
        let now = Utc::now();
        let response = TokenResponse {
            access_token: "new".to_string(),
            expires_in: None,
            refresh_token: Some("rotated".to_string()),
        };
        let stored = response.into_stored(now, Some("old-refresh"));
        assert_eq!(stored.refresh_token.as_deref(), Some("rotated"));
        assert_eq!(
            stored.expires_at,
            now + TimeDelta::seconds(DEFAULT_EXPIRES_IN_SECS)
        );
    }

    #[test]
    fn consent_url_carries_oauth_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Authenticator::new(make_secrets(), dir.path().join("token.json"), 5).unwrap();
        let url = auth.consent_url("http://127.0.0.1:8085/").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(get("client_id"), Some("client-123.apps.googleusercontent.com"));
        assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8085/"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("scope"), Some(SPREADSHEETS_SCOPE));
        assert_eq!(get("access_type"), Some("offline"));
    }
}
