//! Category service
//!
//! Categories are created and listed here; the rollover engine never
//! modifies them.

use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{RolloverError, RolloverResult};
use crate::models::{BudgetCategory, NewCategory, UserId};
use crate::storage::PersistenceGateway;

/// Service for category management
pub struct CategoryService<'a, G: PersistenceGateway + ?Sized> {
    gateway: &'a G,
    audit: Option<&'a AuditLogger>,
}

impl<'a, G: PersistenceGateway + ?Sized> CategoryService<'a, G> {
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

    /// All categories, sorted by name
    pub async fn list(&self, uid: &UserId) -> RolloverResult<Vec<BudgetCategory>> {
        let mut categories = self.gateway.get_categories(uid).await?;
        categories.sort_by_key(|c| c.name.to_lowercase());
        Ok(categories)
    }

    /// Find a category by name (case-insensitive)
    pub async fn find(&self, uid: &UserId, name: &str) -> RolloverResult<BudgetCategory> {
        let needle = name.trim().to_lowercase();
        self.gateway
            .get_categories(uid)
            .await?
            .into_iter()
            .find(|c| c.name.to_lowercase() == needle)
            .ok_or_else(|| RolloverError::category_not_found(name.trim()))
    }

    /// Create a category
    pub async fn add(&self, uid: &UserId, input: NewCategory) -> RolloverResult<BudgetCategory> {
        input.validate()?;

        let name = input.name.trim().to_lowercase();
        let existing = self.gateway.get_categories(uid).await?;
        if existing.iter().any(|c| c.name.to_lowercase() == name) {
            return Err(RolloverError::Validation(format!(
                "Category '{}' already exists",
                input.name.trim()
            )));
        }

        let category = self.gateway.add_category(uid, input).await?;

        if let Some(audit) = self.audit {
            audit.record(&[AuditEntry::create(
                uid,
                EntityType::Category,
                category.id.to_string(),
                &category,
            )
            .with_summary(format!("{} {}", category.name, category.planned_amount))]);
        }

        debug!(user = %uid, name = %category.name, "added category");
        Ok(category)
    }
}
