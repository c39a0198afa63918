//! Export of archive records
//!
//! - CSV: one row per archived expense (spreadsheet-compatible)
//! - JSON: the full record plus summary metadata
//! - YAML: the same as JSON, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_archive_csv;
pub use self::json::{export_archive_json, ArchiveExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::{export_archive_yaml, import_archive_yaml};
