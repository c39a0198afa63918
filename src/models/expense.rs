//! Expense model
//!
//! An expense belongs to whichever budget period contains its date. Expenses
//! are created through `NewExpense`, which validates input at the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{RolloverError, RolloverResult};

/// Maximum length of an expense note
pub const MAX_NOTE_LENGTH: usize = 500;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: NaiveDate,
    /// Category name the expense is booked against
    pub category: String,
    /// Amount spent, never negative
    pub amount: Money,
    #[serde(default)]
    pub note: String,
}

/// Input for creating an expense; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Money,
    pub note: String,
}

impl NewExpense {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: Money) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Check required fields and numeric ranges
    pub fn validate(&self) -> RolloverResult<()> {
        if self.category.trim().is_empty() {
            return Err(RolloverError::Validation(
                "Expense category cannot be empty".into(),
            ));
        }

        if self.amount.is_negative() {
            return Err(RolloverError::Validation(format!(
                "Expense amount cannot be negative: {}",
                self.amount
            )));
        }

        if self.note.len() > MAX_NOTE_LENGTH {
            return Err(RolloverError::Validation(format!(
                "Expense note too long ({} > {} characters)",
                self.note.len(),
                MAX_NOTE_LENGTH
            )));
        }

        Ok(())
    }

    /// Validate and turn into a stored expense with the given id
    pub fn into_expense(self, id: ExpenseId) -> RolloverResult<Expense> {
        self.validate()?;
        Ok(Expense {
            id,
            date: self.date,
            category: self.category.trim().to_string(),
            amount: self.amount,
            note: self.note.trim().to_string(),
        })
    }
}
