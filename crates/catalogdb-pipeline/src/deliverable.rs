//! CSV side files for delivered batches.

use std::io::Write;
use std::path::{Path, PathBuf};

use catalogdb_core::NormalizedRecord;

use crate::batch::Batch;
use crate::error::PipelineError;

/// Writes a header row plus one row per record, in [`NormalizedRecord::COLUMNS`] order.
///
/// The header is written even when `records` is empty.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] if writing or flushing fails.
pub fn write_records<W: Write>(writer: W, records: &[NormalizedRecord]) -> Result<(), PipelineError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(NormalizedRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `records` to a CSV file at `path`, replacing any existing file.
///
/// # Errors
///
/// - [`PipelineError::Io`] if the file cannot be created.
/// - [`PipelineError::Csv`] if writing fails.
pub fn write_records_to_path(
    path: impl AsRef<Path>,
    records: &[NormalizedRecord],
) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_records(std::io::BufWriter::new(file), records)
}

/// Writes `batch` as `deliverable_{n}.csv` inside `output_dir` and returns the path.
///
/// # Errors
///
/// See [`write_records_to_path`].
pub fn write_deliverable(output_dir: &Path, batch: &Batch<'_>) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(batch.file_name());
    write_records_to_path(&path, batch.records())?;
    tracing::info!(
        path = %path.display(),
        batch = batch.ordinal(),
        rows = batch.len(),
        "saved CSV deliverable"
    );
    Ok(path)
}
