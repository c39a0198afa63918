//! In-process store
//!
//! Keeps every user's data in memory. Supports fault injection so callers
//! can exercise failure and retry paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::gateway::PersistenceGateway;
use crate::error::{RolloverError, RolloverResult};
use crate::models::{
    ArchiveRecord, BudgetCategory, CategoryId, Expense, ExpenseId, NewCategory, NewExpense,
    PeriodId, UserId,
};

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetExpenses,
    AddExpense,
    GetCategories,
    AddCategory,
    GetMarker,
    SetMarker,
    GetArchive,
    WriteArchive,
    ListArchives,
    RemoveExpenses,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Default)]
struct UserData {
    expenses: Vec<Expense>,
    categories: Vec<BudgetCategory>,
    marker: Option<String>,
    archives: BTreeMap<PeriodId, ArchiveRecord>,
}

/// Memory-backed `PersistenceGateway`
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserData>>,
    faults: RwLock<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail until cleared
    pub fn fail_on(&self, op: StoreOp) {
        if let Ok(mut faults) = self.faults.write() {
            faults.insert(op);
        }
    }

    pub fn clear_fault(&self, op: StoreOp) {
        if let Ok(mut faults) = self.faults.write() {
            faults.remove(&op);
        }
    }

    /// Overwrite the marker with arbitrary text, bypassing validation
    pub fn set_raw_marker(&self, uid: &UserId, raw: impl Into<String>) -> RolloverResult<()> {
        self.write()?.entry(uid.clone()).or_default().marker = Some(raw.into());
        Ok(())
    }

    fn check(&self, op: StoreOp) -> RolloverResult<()> {
        let faults = self
            .faults
            .read()
            .map_err(|e| RolloverError::StoreUnavailable(format!("fault table poisoned: {}", e)))?;
        if faults.contains(&op) {
            return Err(RolloverError::StoreUnavailable(format!(
                "{} failed: store offline",
                op
            )));
        }
        Ok(())
    }

    fn read(&self) -> RolloverResult<RwLockReadGuard<'_, HashMap<UserId, UserData>>> {
        self.users.read().map_err(|e| {
            RolloverError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> RolloverResult<RwLockWriteGuard<'_, HashMap<UserId, UserData>>> {
        self.users.write().map_err(|e| {
            RolloverError::StoreUnavailable(format!("Failed to acquire write lock: {}", e))
        })
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn get_expenses(&self, uid: &UserId) -> RolloverResult<Vec<Expense>> {
        self.check(StoreOp::GetExpenses)?;
        Ok(self
            .read()?
            .get(uid)
            .map(|u| u.expenses.clone())
            .unwrap_or_default())
    }

    async fn add_expense(&self, uid: &UserId, expense: NewExpense) -> RolloverResult<Expense> {
        self.check(StoreOp::AddExpense)?;
        let expense = expense.into_expense(ExpenseId::new())?;
        self.write()?
            .entry(uid.clone())
            .or_default()
            .expenses
            .push(expense.clone());
        Ok(expense)
    }

    async fn get_categories(&self, uid: &UserId) -> RolloverResult<Vec<BudgetCategory>> {
        self.check(StoreOp::GetCategories)?;
        Ok(self
            .read()?
            .get(uid)
            .map(|u| u.categories.clone())
            .unwrap_or_default())
    }

    async fn add_category(
        &self,
        uid: &UserId,
        category: NewCategory,
    ) -> RolloverResult<BudgetCategory> {
        self.check(StoreOp::AddCategory)?;
        let category = category.into_category(CategoryId::new())?;
        let mut users = self.write()?;
        let categories = &mut users.entry(uid.clone()).or_default().categories;
        if categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(RolloverError::Validation(format!(
                "Category already exists: {}",
                category.name
            )));
        }
        categories.push(category.clone());
        Ok(category)
    }

    async fn get_last_acknowledged_period(&self, uid: &UserId) -> RolloverResult<Option<String>> {
        self.check(StoreOp::GetMarker)?;
        Ok(self.read()?.get(uid).and_then(|u| u.marker.clone()))
    }

    async fn set_last_acknowledged_period(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<()> {
        self.check(StoreOp::SetMarker)?;
        self.write()?.entry(uid.clone()).or_default().marker = Some(period_id.to_string());
        Ok(())
    }

    async fn get_archive_record(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<Option<ArchiveRecord>> {
        self.check(StoreOp::GetArchive)?;
        Ok(self
            .read()?
            .get(uid)
            .and_then(|u| u.archives.get(&period_id).cloned()))
    }

    async fn write_archive_record(
        &self,
        uid: &UserId,
        record: ArchiveRecord,
    ) -> RolloverResult<()> {
        self.check(StoreOp::WriteArchive)?;
        let mut users = self.write()?;
        let archives = &mut users.entry(uid.clone()).or_default().archives;
        if archives.contains_key(&record.period_id) {
            return Err(RolloverError::ArchiveConflict {
                period_id: record.period_id,
            });
        }
        archives.insert(record.period_id, record);
        Ok(())
    }

    async fn list_archive_records(&self, uid: &UserId) -> RolloverResult<Vec<ArchiveRecord>> {
        self.check(StoreOp::ListArchives)?;
        Ok(self
            .read()?
            .get(uid)
            .map(|u| u.archives.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn remove_expenses(&self, uid: &UserId, ids: &[ExpenseId]) -> RolloverResult<usize> {
        self.check(StoreOp::RemoveExpenses)?;
        let doomed: HashSet<ExpenseId> = ids.iter().copied().collect();
        let mut users = self.write()?;
        let Some(user) = users.get_mut(uid) else {
            return Ok(0);
        };
        let before = user.expenses.len();
        user.expenses.retain(|e| !doomed.contains(&e.id));
        Ok(before - user.expenses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn uid() -> UserId {
        UserId::parse("alice").unwrap()
    }

    fn new_expense(day: u32) -> NewExpense {
        NewExpense::new(
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            "Food",
            Money::from_cents(1000),
        )
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryStore::new();
        let bob = UserId::parse("bob").unwrap();

        store.add_expense(&uid(), new_expense(1)).await.unwrap();

        assert_eq!(store.get_expenses(&uid()).await.unwrap().len(), 1);
        assert!(store.get_expenses(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_expense_validates() {
        let store = MemoryStore::new();
        let bad = NewExpense::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "Food",
            Money::from_cents(-1),
        );
        assert!(store.add_expense(&uid(), bad).await.unwrap_err().is_validation());
        assert!(store.get_expenses(&uid()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let store = MemoryStore::new();
        let bob = UserId::parse("bob").unwrap();
        store
            .add_category(&uid(), NewCategory::new("Rent", Money::from_cents(1000)))
            .await
            .unwrap();

        let err = store
            .add_category(&uid(), NewCategory::new("rent", Money::zero()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get_categories(&uid()).await.unwrap().len(), 1);

        // Names are unique per user only
        store
            .add_category(&bob, NewCategory::new("rent", Money::zero()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_archive_write_is_create_only() {
        let store = MemoryStore::new();
        let period = PeriodId::new(2024, 5);
        let first = ArchiveRecord::new(period, Vec::new());
        store.write_archive_record(&uid(), first.clone()).await.unwrap();

        let err = store
            .write_archive_record(&uid(), ArchiveRecord::new(period, Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, RolloverError::ArchiveConflict { .. }));

        let stored = store.get_archive_record(&uid(), period).await.unwrap();
        assert_eq!(stored, Some(first));
    }

    #[tokio::test]
    async fn test_remove_expenses_by_id() {
        let store = MemoryStore::new();
        let a = store.add_expense(&uid(), new_expense(1)).await.unwrap();
        let b = store.add_expense(&uid(), new_expense(2)).await.unwrap();

        let removed = store.remove_expenses(&uid(), &[a.id]).await.unwrap();
        assert_eq!(removed, 1);
        // Already removed ids are ignored
        assert_eq!(store.remove_expenses(&uid(), &[a.id]).await.unwrap(), 0);

        let remaining = store.get_expenses(&uid()).await.unwrap();
        assert_eq!(remaining, vec![b]);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = MemoryStore::new();
        store.fail_on(StoreOp::GetExpenses);
        let err = store.get_expenses(&uid()).await.unwrap_err();
        assert!(err.is_store_unavailable());

        store.clear_fault(StoreOp::GetExpenses);
        assert!(store.get_expenses(&uid()).await.is_ok());
    }

    #[tokio::test]
    async fn test_raw_marker() {
        let store = MemoryStore::new();
        assert_eq!(store.get_last_acknowledged_period(&uid()).await.unwrap(), None);

        store.set_raw_marker(&uid(), "garbage").unwrap();
        assert_eq!(
            store.get_last_acknowledged_period(&uid()).await.unwrap(),
            Some("garbage".to_string())
        );

        store
            .set_last_acknowledged_period(&uid(), PeriodId::new(2024, 6))
            .await
            .unwrap();
        assert_eq!(
            store.get_last_acknowledged_period(&uid()).await.unwrap(),
            Some("2024-06".to_string())
        );
    }
}
