//! Service layer for envelope-rollover
//!
//! The period lifecycle engine (period calculation, rollover detection,
//! archive and acknowledge) plus validated expense and category services
//! on top of the storage layer.

pub mod archive;
pub mod category;
pub mod detector;
pub mod expense;
pub mod period;

pub use archive::{ArchiveManager, ArchiveSummary};
pub use category::CategoryService;
pub use detector::{check_for_new_period, load_check, MarkerState, RolloverCheck};
pub use expense::{ExpenseService, ExpenseWorkingSet, WorkingSetState};
pub use period::{compute_period, format_period_range, PeriodService};
