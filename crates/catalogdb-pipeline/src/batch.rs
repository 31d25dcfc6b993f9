//! Fixed-size, order-preserving partition of the normalized record set.

use catalogdb_core::NormalizedRecord;

use crate::error::PipelineError;

/// One contiguous slice of records destined for a single deliverable.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    ordinal: usize,
    records: &'a [NormalizedRecord],
}

impl<'a> Batch<'a> {
    /// 1-based position of this batch in the partition.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub fn records(&self) -> &'a [NormalizedRecord] {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Title of the spreadsheet this batch is published as, e.g. `"Deliverable 2"`.
    #[must_use]
    pub fn sheet_title(&self) -> String {
        format!("Deliverable {}", self.ordinal)
    }

    /// File name of the CSV side file, e.g. `"deliverable_2.csv"`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("deliverable_{}.csv", self.ordinal)
    }
}

/// Slices `records` into consecutive batches of at most `chunk_size`.
///
/// Only the last batch may be short. An empty input yields no batches.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidChunkSize`] when `chunk_size` is zero.
pub fn split_into_chunks(
    records: &[NormalizedRecord],
    chunk_size: usize,
) -> Result<Vec<Batch<'_>>, PipelineError> {
    if chunk_size == 0 {
        return Err(PipelineError::InvalidChunkSize);
    }

    Ok(records
        .chunks(chunk_size)
        .enumerate()
        .map(|(idx, records)| Batch {
            ordinal: idx + 1,
            records,
        })
        .collect())
}
