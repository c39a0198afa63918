//! Abstract store consumed by the rollover engine

use async_trait::async_trait;

use crate::error::RolloverResult;
use crate::models::{
    ArchiveRecord, BudgetCategory, Expense, ExpenseId, NewCategory, NewExpense, PeriodId, UserId,
};

/// Persistence contract for expenses, categories, archive records and the
/// last-acknowledged marker
///
/// Every method may suspend. Failures surface as
/// `RolloverError::StoreUnavailable` and are never retried by the engine.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// All expenses in the user's active working set
    async fn get_expenses(&self, uid: &UserId) -> RolloverResult<Vec<Expense>>;

    /// Validate and store an expense, assigning its id
    async fn add_expense(&self, uid: &UserId, expense: NewExpense) -> RolloverResult<Expense>;

    async fn get_categories(&self, uid: &UserId) -> RolloverResult<Vec<BudgetCategory>>;

    async fn add_category(
        &self,
        uid: &UserId,
        category: NewCategory,
    ) -> RolloverResult<BudgetCategory>;

    /// Raw marker text, `None` if never written
    async fn get_last_acknowledged_period(&self, uid: &UserId) -> RolloverResult<Option<String>>;

    async fn set_last_acknowledged_period(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<()>;

    async fn get_archive_record(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<Option<ArchiveRecord>>;

    /// Create the record for its period if none exists
    ///
    /// Returns `RolloverError::ArchiveConflict` and leaves the stored record
    /// untouched when one is already present.
    async fn write_archive_record(&self, uid: &UserId, record: ArchiveRecord)
        -> RolloverResult<()>;

    /// All archive records, oldest period first
    async fn list_archive_records(&self, uid: &UserId) -> RolloverResult<Vec<ArchiveRecord>>;

    /// Remove expenses by id from the working set, returning how many were
    /// present. Ids that are already gone are ignored.
    async fn remove_expenses(&self, uid: &UserId, ids: &[ExpenseId]) -> RolloverResult<usize>;
}
