//! CSV loading with header normalization and required-column validation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use catalogdb_core::RawRecord;
use csv::ByteRecord;

use crate::error::PipelineError;

/// Columns every input file must carry (after header normalization).
pub const REQUIRED_COLUMNS: [&str; 4] = ["barcode_number", "barcode_formats", "title", "category"];

/// Optional column whose value is prepended to extracted sizes.
pub const SIZE_COLUMN: &str = "size";

/// Positions of the columns the pipeline reads, resolved once from the header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    barcode_number: usize,
    barcode_formats: usize,
    title: usize,
    category: usize,
    size: Option<usize>,
}

impl ColumnIndex {
    /// Resolves column positions from normalized header names.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingColumns`] listing every absent
    /// required column.
    fn resolve(headers: &[String]) -> Result<Self, PipelineError> {
        let position = |name: &str| headers.iter().position(|h| h.as_str() == name);

        let found = REQUIRED_COLUMNS.map(position);
        let [Some(barcode_number), Some(barcode_formats), Some(title), Some(category)] = found
        else {
            let missing = REQUIRED_COLUMNS
                .iter()
                .zip(found)
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| (*name).to_string())
                .collect();
            return Err(PipelineError::MissingColumns { missing });
        };

        Ok(Self {
            barcode_number,
            barcode_formats,
            title,
            category,
            size: position(SIZE_COLUMN),
        })
    }
}

/// Lower-cases and trims a header cell.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Loads raw records from a CSV file on disk.
///
/// # Errors
///
/// - [`PipelineError::Io`] if the file cannot be opened.
/// - [`PipelineError::MissingColumns`] if required columns are absent.
/// - [`PipelineError::Csv`] if the CSV stream itself cannot be read.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_records_from_reader(file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "loaded raw catalog");
    Ok(records)
}

/// Loads raw records from any CSV byte stream with a header row.
///
/// Cells are decoded lossily so a stray non-UTF-8 byte degrades one value
/// instead of aborting the load. Short rows read missing cells as empty.
///
/// # Errors
///
/// - [`PipelineError::MissingColumns`] if required columns are absent; no
///   rows are read in that case.
/// - [`PipelineError::Csv`] if the CSV stream itself cannot be read.
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| normalize_header(&String::from_utf8_lossy(h)))
        .collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        records.push(to_raw_record(&row, columns));
    }

    tracing::debug!(rows = records.len(), "parsed CSV rows");
    Ok(records)
}

fn to_raw_record(row: &ByteRecord, columns: ColumnIndex) -> RawRecord {
    let cell = |idx: usize| -> String {
        row.get(idx)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    };
    let optional_cell = |idx: usize| -> Option<String> {
        let value = cell(idx);
        (!value.trim().is_empty()).then_some(value)
    };

    RawRecord {
        barcode_number: cell(columns.barcode_number),
        barcode_formats: cell(columns.barcode_formats),
        title: optional_cell(columns.title),
        category: optional_cell(columns.category),
        size: columns.size.and_then(optional_cell),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_rows_with_normalized_headers() {
        let csv = "\
 Barcode_Number ,BARCODE_FORMATS,Title,Category,Size,Manufacturer
012345678905,UPC-A 012345678905,Acme Super Clean Gel,Health > Beauty,500ml,Acme Inc
";
        let records = load_records_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.barcode_number, "012345678905");
        assert_eq!(record.barcode_formats, "UPC-A 012345678905");
        assert_eq!(record.title.as_deref(), Some("Acme Super Clean Gel"));
        assert_eq!(record.category.as_deref(), Some("Health > Beauty"));
        assert_eq!(record.size.as_deref(), Some("500ml"));
    }

    #[test]
    fn size_column_is_optional() {
        let csv = "barcode_number,barcode_formats,title,category\n1,EAN-13 1,Dove Soap,Beauty\n";
        let records = load_records_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].size.is_none());
    }

    #[test]
    fn missing_title_column_is_reported() {
        let csv = "barcode_number,barcode_formats,category\n1,EAN-13 1,Beauty\n";
        let err = load_records_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["title".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn every_missing_column_is_reported_in_order() {
        let csv = "category,notes\nBeauty,x\n";
        let err = load_records_from_reader(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(
            matches!(err, PipelineError::MissingColumns { ref missing }
                if missing == &["barcode_number", "barcode_formats", "title"]),
            "unexpected error: {err:?}"
        );
        assert!(message.contains("barcode_number, barcode_formats, title"));
    }

    #[test]
    fn empty_cells_become_absent() {
        let csv = "barcode_number,barcode_formats,title,category,size\n,, ,,\n";
        let records = load_records_from_reader(csv.as_bytes()).unwrap();
        let record = &records[0];
        assert_eq!(record.barcode_number, "");
        assert_eq!(record.barcode_formats, "");
        assert!(record.title.is_none());
        assert!(record.category.is_none());
        assert!(record.size.is_none());
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let csv = "barcode_number,barcode_formats,title,category,size\n42,EAN-8 42\n";
        let records = load_records_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].barcode_number, "42");
        assert!(records[0].title.is_none());
        assert!(records[0].category.is_none());
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let csv = "barcode_number,barcode_formats,title,category\n\
                   7,\"UPC-A 7, EAN-13 07\",\"Acme, Inc Gel\",Beauty\n";
        let records = load_records_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].barcode_formats, "UPC-A 7, EAN-13 07");
        assert_eq!(records[0].title.as_deref(), Some("Acme, Inc Gel"));
    }

    #[test]
    fn invalid_utf8_degrades_instead_of_failing() {
        let mut bytes = b"barcode_number,barcode_formats,title,category\n1,EAN,Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" Cream,Beauty\n");
        let records = load_records_from_reader(bytes.as_slice()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].title.as_deref().unwrap().starts_with("Caf"));
    }

    #[test]
    fn load_records_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "barcode_number,barcode_formats,title,category").unwrap();
        writeln!(file, "1,EAN-13 1,Acme Gel,Beauty").unwrap();
        writeln!(file, "2,EAN-13 2,Acme Amp,Electronics").unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].barcode_number, "2");
    }

    #[test]
    fn load_records_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
