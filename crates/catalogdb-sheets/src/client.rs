//! HTTP client for the Google Sheets v4 REST API.
//!
//! Only the two calls the publisher needs are wrapped: creating a spreadsheet
//! and overwriting a value range. Non-2xx responses surface as
//! [`SheetsError::UnexpectedStatus`] with the response body attached.

use std::time::Duration;

use catalogdb_core::NormalizedRecord;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::SheetsError;
use crate::types::{
    CreateSpreadsheetRequest, CreateSpreadsheetResponse, SpreadsheetProperties,
    UpdateValuesResponse, ValueRange,
};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

/// Values are written starting at the top-left cell of the first sheet.
const UPLOAD_RANGE: &str = "A1";

/// Client for the Sheets API, authenticated with a bearer access token.
///
/// Use [`SheetsClient::new`] for production or [`SheetsClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SheetsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catalogdb/0.1 (catalog-deliverables)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| SheetsError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.to_owned(),
        })
    }

    /// Creates an empty spreadsheet titled `title` and returns its ID.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::UnexpectedStatus`] if the API rejects the request.
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::Deserialize`] if the response lacks `spreadsheetId`.
    pub async fn create_spreadsheet(&self, title: &str) -> Result<String, SheetsError> {
        let mut url = self.spreadsheets_url(&[]);
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");

        let request = CreateSpreadsheetRequest {
            properties: SpreadsheetProperties { title },
        };
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let created: CreateSpreadsheetResponse =
            Self::parse_response(response, &url, format!("create spreadsheet '{title}'")).await?;

        tracing::debug!(spreadsheet_id = %created.spreadsheet_id, %title, "created spreadsheet");
        Ok(created.spreadsheet_id)
    }

    /// Overwrites `range` with `rows`. Values are stored as given (`RAW`), so
    /// barcodes keep their leading zeros.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_spreadsheet`].
    pub async fn write_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<UpdateValuesResponse, SheetsError> {
        let mut url = self.spreadsheets_url(&[spreadsheet_id, "values", range]);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRange {
            major_dimension: "ROWS",
            values: rows,
        };
        let response = self
            .client
            .put(url.clone())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response, &url, format!("update values in {spreadsheet_id}")).await
    }

    /// Publishes one batch as a new spreadsheet: a header row followed by one
    /// row per record, in order. Returns the new spreadsheet's ID.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::create_spreadsheet`] and
    /// [`Self::write_values`].
    pub async fn upload_batch(
        &self,
        records: &[NormalizedRecord],
        title: &str,
    ) -> Result<String, SheetsError> {
        let spreadsheet_id = self.create_spreadsheet(title).await?;
        let rows = to_value_rows(records);
        let updated = self
            .write_values(&spreadsheet_id, UPLOAD_RANGE, &rows)
            .await?;

        tracing::info!(
            %spreadsheet_id,
            %title,
            rows = records.len(),
            updated_cells = updated.updated_cells,
            "uploaded batch to google sheets"
        );
        Ok(spreadsheet_id)
    }

    /// `{base}/v4/spreadsheets[/segment...]` with each segment percent-encoded.
    fn spreadsheets_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["v4", "spreadsheets"]);
            path.extend(segments);
        }
        url
    }

    async fn parse_response<T: DeserializeOwned>(
        response: Response,
        url: &Url,
        context: String,
    ) -> Result<T, SheetsError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize { context, source: e })
    }
}

/// Header row plus one row per record, columns in delivery order.
#[must_use]
pub fn to_value_rows(records: &[NormalizedRecord]) -> Vec<Vec<String>> {
    let header = NormalizedRecord::COLUMNS.iter().map(|c| (*c).to_string());
    std::iter::once(header.collect())
        .chain(records.iter().map(|record| {
            record
                .values()
                .iter()
                .map(|value| (*value).to_string())
                .collect()
        }))
        .collect()
}
