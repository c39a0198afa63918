//! Expense service
//!
//! Validated entry point for recording expenses, plus `ExpenseWorkingSet`,
//! the in-memory view a front end keeps of the active working set.

use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::RolloverResult;
use crate::models::{Expense, ExpenseId, NewExpense, Period, UserId};
use crate::storage::PersistenceGateway;

/// Service for expense management
pub struct ExpenseService<'a, G: PersistenceGateway + ?Sized> {
    gateway: &'a G,
    audit: Option<&'a AuditLogger>,
}

impl<'a, G: PersistenceGateway + ?Sized> ExpenseService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Record a new expense
    ///
    /// Input is validated before anything reaches the store.
    pub async fn add(&self, uid: &UserId, input: NewExpense) -> RolloverResult<Expense> {
        input.validate()?;
        let expense = self.gateway.add_expense(uid, input).await?;

        if let Some(audit) = self.audit {
            audit.record(&[AuditEntry::create(
                uid,
                EntityType::Expense,
                expense.id.to_string(),
                &expense,
            )
            .with_summary(format!("{} {}", expense.category, expense.amount))]);
        }

        debug!(user = %uid, id = %expense.id, "added expense");
        Ok(expense)
    }

    /// All expenses in the working set, oldest first
    pub async fn list(&self, uid: &UserId) -> RolloverResult<Vec<Expense>> {
        let mut expenses = self.gateway.get_expenses(uid).await?;
        expenses.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(expenses)
    }

    /// Expenses dated within `period`, oldest first
    pub async fn list_for_period(&self, uid: &UserId, period: &Period) -> RolloverResult<Vec<Expense>> {
        let mut expenses = self.list(uid).await?;
        expenses.retain(|e| period.contains(e.date));
        Ok(expenses)
    }
}

/// Load state of a working set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingSetState {
    NotLoaded,
    Loaded,
    /// The last load failed; entries are empty rather than stale
    LoadFailed(String),
}

/// Client-side copy of a user's working set with optimistic inserts
///
/// An optimistic insert shows the expense immediately under a provisional
/// id. When the store confirms, the entry is replaced by the stored expense;
/// when it fails, the entry is removed again.
#[derive(Debug, Clone)]
pub struct ExpenseWorkingSet {
    entries: Vec<Expense>,
    pending: Vec<ExpenseId>,
    state: WorkingSetState,
}

impl Default for ExpenseWorkingSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseWorkingSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending: Vec::new(),
            state: WorkingSetState::NotLoaded,
        }
    }

    pub fn entries(&self) -> &[Expense] {
        &self.entries
    }

    pub fn state(&self) -> &WorkingSetState {
        &self.state
    }

    pub fn is_pending(&self, id: ExpenseId) -> bool {
        self.pending.contains(&id)
    }

    /// Replace the entries with the store's working set
    pub async fn load<G: PersistenceGateway + ?Sized>(
        &mut self,
        gateway: &G,
        uid: &UserId,
    ) -> RolloverResult<()> {
        match gateway.get_expenses(uid).await {
            Ok(expenses) => {
                self.entries = expenses;
                self.pending.clear();
                self.state = WorkingSetState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(user = %uid, error = %e, "failed to load working set");
                self.entries.clear();
                self.pending.clear();
                self.state = WorkingSetState::LoadFailed(e.to_string());
                Err(e)
            }
        }
    }

    /// Show an expense immediately and persist it
    pub async fn add_optimistic<G: PersistenceGateway + ?Sized>(
        &mut self,
        gateway: &G,
        uid: &UserId,
        input: NewExpense,
    ) -> RolloverResult<Expense> {
        let provisional = input.clone().into_expense(ExpenseId::new())?;
        let provisional_id = provisional.id;
        self.entries.push(provisional);
        self.pending.push(provisional_id);

        let result = gateway.add_expense(uid, input).await;
        self.pending.retain(|id| *id != provisional_id);

        match result {
            Ok(stored) => {
                if let Some(slot) = self.entries.iter_mut().find(|e| e.id == provisional_id) {
                    *slot = stored.clone();
                }
                Ok(stored)
            }
            Err(e) => {
                warn!(user = %uid, error = %e, "expense write failed, reverting");
                self.entries.retain(|e| e.id != provisional_id);
                Err(e)
            }
        }
    }
}
