//! Catalog normalization core: load, filter, decompose and batch product rows.

pub mod batch;
pub mod category;
pub mod combine;
pub mod deliverable;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod size_tokens;
pub mod title;

pub use batch::{split_into_chunks, Batch};
pub use category::split_category;
pub use combine::{combine_size, SizedFields};
pub use deliverable::{write_deliverable, write_records, write_records_to_path};
pub use error::PipelineError;
pub use filter::{filter_records, is_allowed_category, ALLOWED_CATEGORY_KEYWORDS};
pub use loader::{load_records, load_records_from_reader, REQUIRED_COLUMNS};
pub use normalize::{normalize_record, normalize_records, process_raw_data, process_reader};
pub use size_tokens::{extract_size_tokens, is_size_token};
pub use title::split_title;
