//! JSON file store
//!
//! Layout, one directory per user under the data directory:
//!
//! ```text
//! data/<uid>/expenses.json
//! data/<uid>/categories.json
//! data/<uid>/marker.json
//! data/<uid>/archives/<YYYY-MM>.json
//! ```
//!
//! File I/O runs on the blocking thread pool. Read-modify-write cycles on
//! the expense and category files are serialized by a process-wide lock.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{create_json_exclusive, read_json, read_json_optional, write_json_atomic};
use super::gateway::PersistenceGateway;
use crate::config::paths::RolloverPaths;
use crate::error::{RolloverError, RolloverResult};
use crate::models::{
    ArchiveRecord, BudgetCategory, CategoryId, Expense, ExpenseId, LastAcknowledgedMarker,
    NewCategory, NewExpense, PeriodId, UserId,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CategoryData {
    categories: Vec<BudgetCategory>,
}

/// File-backed `PersistenceGateway`
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonStore {
    pub fn new(paths: &RolloverPaths) -> Self {
        Self::with_data_dir(paths.data_dir())
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn user_dir(&self, uid: &UserId) -> PathBuf {
        self.data_dir.join(uid.as_str())
    }

    fn expenses_file(&self, uid: &UserId) -> PathBuf {
        self.user_dir(uid).join("expenses.json")
    }

    fn categories_file(&self, uid: &UserId) -> PathBuf {
        self.user_dir(uid).join("categories.json")
    }

    fn marker_file(&self, uid: &UserId) -> PathBuf {
        self.user_dir(uid).join("marker.json")
    }

    fn archives_dir(&self, uid: &UserId) -> PathBuf {
        self.user_dir(uid).join("archives")
    }

    fn archive_file(&self, uid: &UserId, period_id: PeriodId) -> PathBuf {
        self.archives_dir(uid).join(format!("{}.json", period_id))
    }
}

async fn blocking<T, F>(f: F) -> RolloverResult<T>
where
    F: FnOnce() -> RolloverResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RolloverError::StoreUnavailable(format!("storage task failed: {}", e)))?
}

fn lock(write_lock: &Mutex<()>) -> RolloverResult<std::sync::MutexGuard<'_, ()>> {
    write_lock
        .lock()
        .map_err(|e| RolloverError::StoreUnavailable(format!("Failed to acquire lock: {}", e)))
}

/// Read the marker file, returning its raw text when it isn't a valid marker
fn read_marker(path: &Path) -> RolloverResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|e| {
        RolloverError::StoreUnavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;
    match serde_json::from_str::<LastAcknowledgedMarker>(&contents) {
        Ok(marker) => Ok(Some(marker.period_id)),
        Err(_) => Ok(Some(contents.trim().to_string())),
    }
}

#[async_trait]
impl PersistenceGateway for JsonStore {
    async fn get_expenses(&self, uid: &UserId) -> RolloverResult<Vec<Expense>> {
        let path = self.expenses_file(uid);
        blocking(move || {
            let data: ExpenseData = read_json(&path)?;
            Ok(data.expenses)
        })
        .await
    }

    async fn add_expense(&self, uid: &UserId, expense: NewExpense) -> RolloverResult<Expense> {
        let expense = expense.into_expense(ExpenseId::new())?;
        let path = self.expenses_file(uid);
        let write_lock = Arc::clone(&self.write_lock);
        blocking(move || {
            let _guard = lock(&write_lock)?;
            let mut data: ExpenseData = read_json(&path)?;
            data.expenses.push(expense.clone());
            data.expenses.sort_by(|a, b| a.date.cmp(&b.date));
            write_json_atomic(&path, &data)?;
            Ok(expense)
        })
        .await
    }

    async fn get_categories(&self, uid: &UserId) -> RolloverResult<Vec<BudgetCategory>> {
        let path = self.categories_file(uid);
        blocking(move || {
            let data: CategoryData = read_json(&path)?;
            Ok(data.categories)
        })
        .await
    }

    async fn add_category(
        &self,
        uid: &UserId,
        category: NewCategory,
    ) -> RolloverResult<BudgetCategory> {
        let category = category.into_category(CategoryId::new())?;
        let path = self.categories_file(uid);
        let write_lock = Arc::clone(&self.write_lock);
        blocking(move || {
            let _guard = lock(&write_lock)?;
            let mut data: CategoryData = read_json(&path)?;
            if data
                .categories
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&category.name))
            {
                return Err(RolloverError::Validation(format!(
                    "Category already exists: {}",
                    category.name
                )));
            }
            data.categories.push(category.clone());
            write_json_atomic(&path, &data)?;
            Ok(category)
        })
        .await
    }

    async fn get_last_acknowledged_period(&self, uid: &UserId) -> RolloverResult<Option<String>> {
        let path = self.marker_file(uid);
        blocking(move || read_marker(&path)).await
    }

    async fn set_last_acknowledged_period(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<()> {
        let path = self.marker_file(uid);
        blocking(move || write_json_atomic(&path, &LastAcknowledgedMarker::new(period_id))).await
    }

    async fn get_archive_record(
        &self,
        uid: &UserId,
        period_id: PeriodId,
    ) -> RolloverResult<Option<ArchiveRecord>> {
        let path = self.archive_file(uid, period_id);
        blocking(move || read_json_optional(&path)).await
    }

    async fn write_archive_record(
        &self,
        uid: &UserId,
        record: ArchiveRecord,
    ) -> RolloverResult<()> {
        let path = self.archive_file(uid, record.period_id);
        blocking(move || {
            if create_json_exclusive(&path, &record)? {
                debug!(path = %path.display(), "wrote archive record");
                Ok(())
            } else {
                Err(RolloverError::ArchiveConflict {
                    period_id: record.period_id,
                })
            }
        })
        .await
    }

    async fn list_archive_records(&self, uid: &UserId) -> RolloverResult<Vec<ArchiveRecord>> {
        let dir = self.archives_dir(uid);
        blocking(move || {
            if !dir.exists() {
                return Ok(Vec::new());
            }
            let entries = fs::read_dir(&dir).map_err(|e| {
                RolloverError::StoreUnavailable(format!("Failed to list {}: {}", dir.display(), e))
            })?;

            let mut records = Vec::new();
            for entry in entries {
                let path = entry
                    .map_err(|e| RolloverError::StoreUnavailable(e.to_string()))?
                    .path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(record) = read_json_optional::<ArchiveRecord, _>(&path)? {
                    records.push(record);
                }
            }
            records.sort_by_key(|r| r.period_id);
            Ok(records)
        })
        .await
    }

    async fn remove_expenses(&self, uid: &UserId, ids: &[ExpenseId]) -> RolloverResult<usize> {
        let doomed: HashSet<ExpenseId> = ids.iter().copied().collect();
        let path = self.expenses_file(uid);
        let write_lock = Arc::clone(&self.write_lock);
        blocking(move || {
            let _guard = lock(&write_lock)?;
            let mut data: ExpenseData = read_json(&path)?;
            let before = data.expenses.len();
            data.expenses.retain(|e| !doomed.contains(&e.id));
            let removed = before - data.expenses.len();
            if removed > 0 {
                write_json_atomic(&path, &data)?;
            }
            Ok(removed)
        })
        .await
    }
}
