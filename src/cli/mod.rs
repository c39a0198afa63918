//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Every handler
//! works on a `CliContext` that owns the store, settings and audit log for
//! the selected user.

pub mod archive;
pub mod category;
pub mod config;
pub mod expense;
pub mod rollover;

pub use archive::{handle_archives_command, ArchiveCommands, ExportFormat};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use rollover::{
    handle_archive, handle_check, handle_continue, handle_status, print_pending_notice,
};

use chrono::NaiveDate;

use crate::audit::AuditLogger;
use crate::clock::Clock;
use crate::config::{RolloverPaths, Settings};
use crate::error::{RolloverError, RolloverResult};
use crate::models::{Money, UserId};
use crate::storage::JsonStore;

/// Everything a command handler needs
pub struct CliContext {
    pub paths: RolloverPaths,
    pub settings: Settings,
    pub store: JsonStore,
    pub audit: AuditLogger,
    pub clock: Box<dyn Clock>,
    pub user: UserId,
}

impl CliContext {
    /// Build a context over `paths`, selecting `user` or the configured default
    pub fn new(
        paths: RolloverPaths,
        settings: Settings,
        clock: Box<dyn Clock>,
        user: Option<&str>,
    ) -> RolloverResult<Self> {
        let user = UserId::parse(user.unwrap_or(&settings.default_user))?;
        let store = JsonStore::new(&paths);
        let audit = AuditLogger::new(paths.audit_log());
        Ok(Self {
            paths,
            settings,
            store,
            audit,
            clock,
            user,
        })
    }

    pub fn start_day(&self) -> u32 {
        crate::services::period::clamp_start_day(self.settings.period_start_day)
    }
}

/// Parse a money argument such as "12.50" or "$12.50"
pub(crate) fn parse_money(s: &str, what: &str) -> RolloverResult<Money> {
    Money::parse(s).map_err(|e| RolloverError::Validation(format!("Invalid {}: {}", what, e)))
}

/// Parse a date in the configured format, accepting ISO dates as well
pub(crate) fn parse_date(s: &str, date_format: &str) -> RolloverResult<NaiveDate> {
    NaiveDate::parse_from_str(s, date_format)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| {
            RolloverError::Validation(format!(
                "Invalid date '{}'. Expected format {}",
                s, date_format
            ))
        })
}
