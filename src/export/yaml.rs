//! YAML export of an archive record
//!
//! Human-readable copy of a record that can be read back with
//! `import_archive_yaml`.

use std::io::Write;

use super::json::ArchiveExport;
use crate::error::{RolloverError, RolloverResult};
use crate::models::ArchiveRecord;

/// Write the record as YAML with a short comment header
pub fn export_archive_yaml<W: Write>(record: &ArchiveRecord, writer: &mut W) -> RolloverResult<()> {
    let export = ArchiveExport::new(record.clone());
    let export_err = |e: std::io::Error| RolloverError::Export(e.to_string());

    writeln!(writer, "# envelope-rollover archive: {}", record.period_id).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(|e| RolloverError::Export(e.to_string()))?;
    Ok(())
}

/// Read an archive export back
pub fn import_archive_yaml(yaml_str: &str) -> RolloverResult<ArchiveExport> {
    let export: ArchiveExport =
        serde_yaml::from_str(yaml_str).map_err(|e| RolloverError::Export(e.to_string()))?;

    if export.expense_count != export.record.snapshot.len() {
        return Err(RolloverError::Export(format!(
            "Export claims {} expenses but contains {}",
            export.expense_count,
            export.record.snapshot.len()
        )));
    }

    Ok(export)
}
