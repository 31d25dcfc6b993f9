use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input header lacks one or more required columns. Every absent
    /// column is listed, in declaration order.
    #[error("the following required columns are missing: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}
