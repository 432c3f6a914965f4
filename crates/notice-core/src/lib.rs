//! 3-day notice generation pipeline
//!
//! Turns a CSV of tenant records plus four user-supplied date strings into
//! one filled-and-flattened PDF notice per row, bundled into a ZIP:
//!
//! extract records -> per row (map fields, fill template, flatten) -> archive
//!
//! Everything a run produces lives in a scoped temp directory owned by the
//! returned [`NoticeBatch`]; dropping the batch removes all of it.

pub mod archive;
pub mod error;
pub mod fields;
pub mod fill;
pub mod flatten;
pub mod pipeline;
pub mod records;

pub use archive::archive_notices;
pub use error::NoticeError;
pub use fields::{build_field_map, FieldMap, NoticeContext, COMPANY_NAME, PHONE};
pub use fill::{artifact_file_name, fill_template};
pub use flatten::flatten_notice;
pub use pipeline::{NoticeBatch, NoticePipeline};
pub use records::{extract_records, TenantRecord, REQUIRED_COLUMNS};
