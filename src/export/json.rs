//! JSON export of an archive record

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RolloverError, RolloverResult};
use crate::models::{ArchiveRecord, Money};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Archive record wrapped with export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub expense_count: usize,
    pub total: Money,
    pub record: ArchiveRecord,
}

impl ArchiveExport {
    pub fn new(record: ArchiveRecord) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expense_count: record.snapshot.len(),
            total: record.total(),
            record,
        }
    }
}

/// Write the record as pretty-printed JSON
pub fn export_archive_json<W: Write>(record: &ArchiveRecord, writer: &mut W) -> RolloverResult<()> {
    let export = ArchiveExport::new(record.clone());
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| RolloverError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| RolloverError::Export(e.to_string()))?;
    Ok(())
}
