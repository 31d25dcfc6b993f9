//! Request and response shapes for the Sheets v4 endpoints used here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CreateSpreadsheetRequest<'a> {
    pub(crate) properties: SpreadsheetProperties<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpreadsheetProperties<'a> {
    pub(crate) title: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSpreadsheetResponse {
    pub(crate) spreadsheet_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRange<'a> {
    pub(crate) major_dimension: &'static str,
    pub(crate) values: &'a [Vec<String>],
}

/// Summary returned by `spreadsheets.values.update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: String,
    pub updated_range: String,
    pub updated_rows: u64,
    pub updated_columns: u64,
    pub updated_cells: u64,
}
