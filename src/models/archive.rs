//! Archive records and the last-acknowledged marker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::ids::ExpenseId;
use super::money::Money;
use super::period::PeriodId;

/// Immutable snapshot of the expenses of one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub period_id: PeriodId,
    pub snapshot: Vec<Expense>,
    pub archived_at: DateTime<Utc>,
}

impl ArchiveRecord {
    pub fn new(period_id: PeriodId, mut snapshot: Vec<Expense>) -> Self {
        snapshot.sort_by(|a, b| a.date.cmp(&b.date).then(a.category.cmp(&b.category)));
        Self {
            period_id,
            snapshot,
            archived_at: Utc::now(),
        }
    }

    pub fn expense_ids(&self) -> Vec<ExpenseId> {
        self.snapshot.iter().map(|e| e.id).collect()
    }

    pub fn total(&self) -> Money {
        self.snapshot.iter().map(|e| e.amount).sum()
    }
}

/// The last period the user explicitly dealt with
///
/// Stored as raw text: a value that fails to parse is a corrupted marker and
/// is reported rather than silently discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAcknowledgedMarker {
    pub period_id: String,
}

impl LastAcknowledgedMarker {
    pub fn new(period_id: PeriodId) -> Self {
        Self {
            period_id: period_id.to_string(),
        }
    }

    pub fn parsed(&self) -> Option<PeriodId> {
        PeriodId::parse(&self.period_id).ok()
    }
}
