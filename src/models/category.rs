//! Budget category model
//!
//! Categories carry a planned amount per period. The rollover engine only
//! reads them.

use serde::{Deserialize, Serialize};

use super::ids::CategoryId;
use super::money::Money;
use crate::error::{RolloverError, RolloverResult};

/// A budget category with its planned amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: CategoryId,
    pub name: String,
    pub planned_amount: Money,
}

/// Input for creating a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub planned_amount: Money,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, planned_amount: Money) -> Self {
        Self {
            name: name.into(),
            planned_amount,
        }
    }

    pub fn validate(&self) -> RolloverResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RolloverError::Validation(
                "Category name cannot be empty".into(),
            ));
        }
        if name.len() > 50 {
            return Err(RolloverError::Validation(format!(
                "Category name too long ({} > 50 characters)",
                name.len()
            )));
        }
        if self.planned_amount.is_negative() {
            return Err(RolloverError::Validation(format!(
                "Planned amount cannot be negative: {}",
                self.planned_amount
            )));
        }
        Ok(())
    }

    pub fn into_category(self, id: CategoryId) -> RolloverResult<BudgetCategory> {
        self.validate()?;
        Ok(BudgetCategory {
            id,
            name: self.name.trim().to_string(),
            planned_amount: self.planned_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_category() {
        let category = NewCategory::new(" Rent ", Money::from_cents(120000))
            .into_category(CategoryId::new())
            .unwrap();
        assert_eq!(category.name, "Rent");
    }

    #[test]
    fn test_invalid_categories() {
        assert!(NewCategory::new("", Money::zero()).validate().is_err());
        assert!(NewCategory::new("x".repeat(51), Money::zero())
            .validate()
            .is_err());
        assert!(NewCategory::new("Rent", Money::from_cents(-5))
            .validate()
            .is_err());
    }
}
