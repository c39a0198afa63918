//! Audit logging for envelope-rollover
//!
//! Records expense creation, archive writes, expense removal and marker
//! changes in an append-only JSONL log.
//!
//! - `AuditEntry`: one logged operation with optional before/after values.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
