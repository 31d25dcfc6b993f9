//! Row-level normalization from [`RawRecord`] to [`NormalizedRecord`].
//!
//! Composes the title split, size combination and category split. Each row is
//! independent; absent fields degrade to empty strings rather than errors.

use std::io::Read;
use std::path::Path;

use catalogdb_core::{NormalizedRecord, RawRecord};

use crate::category::split_category;
use crate::combine::combine_size;
use crate::error::PipelineError;
use crate::filter::filter_records;
use crate::loader::{load_records, load_records_from_reader};
use crate::title::split_title;

/// Normalizes one raw row into the delivery columns.
#[must_use]
pub fn normalize_record(raw: &RawRecord) -> NormalizedRecord {
    let (brand, product_name) = split_title(raw.title.as_deref());
    let sized = combine_size(&brand, &product_name, raw.size.as_deref());
    let (category, subcategory) = split_category(raw.category.as_deref());

    NormalizedRecord {
        product_id: raw.barcode_number.clone(),
        upc_ean: raw.barcode_formats.clone(),
        brand: sized.brand,
        product_name: sized.product_name,
        category,
        subcategory,
        size: sized.size,
    }
}

/// Filters raw rows to in-scope categories and normalizes the survivors,
/// preserving input order.
#[must_use]
pub fn normalize_records(raw: Vec<RawRecord>) -> Vec<NormalizedRecord> {
    let total = raw.len();
    let kept = filter_records(raw);
    tracing::info!(
        total,
        kept = kept.len(),
        dropped = total - kept.len(),
        "filtered catalog rows by category"
    );
    kept.iter().map(normalize_record).collect()
}

/// Loads, filters and normalizes a catalog CSV file.
///
/// # Errors
///
/// Propagates loader failures; see [`load_records`].
pub fn process_raw_data(path: impl AsRef<Path>) -> Result<Vec<NormalizedRecord>, PipelineError> {
    let raw = load_records(path)?;
    Ok(normalize_records(raw))
}

/// Loads, filters and normalizes catalog CSV from any byte stream.
///
/// # Errors
///
/// Propagates loader failures; see [`load_records_from_reader`].
pub fn process_reader<R: Read>(reader: R) -> Result<Vec<NormalizedRecord>, PipelineError> {
    let raw = load_records_from_reader(reader)?;
    Ok(normalize_records(raw))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
