//! Core data models for envelope-rollover
//!
//! Periods, expenses, categories, archive records and the marker that
//! records which period the user last dealt with.

pub mod archive;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;

pub use archive::{ArchiveRecord, LastAcknowledgedMarker};
pub use category::{BudgetCategory, NewCategory};
pub use expense::{Expense, NewExpense};
pub use ids::{CategoryId, ExpenseId, UserId};
pub use money::Money;
pub use period::{Period, PeriodId, PeriodParseError};
