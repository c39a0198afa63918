//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Expense,
    Category,
    ArchiveRecord,
    Marker,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Category => write!(f, "Category"),
            EntityType::ArchiveRecord => write!(f, "ArchiveRecord"),
            EntityType::Marker => write!(f, "Marker"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// User whose data was changed
    pub user_id: UserId,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Entity state before the operation (updates/deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Entity state after the operation (creates/updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Short human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn base(
        user_id: &UserId,
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id: user_id.clone(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            before: None,
            after: None,
            summary: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Serialize>(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(user_id, Operation::Create, entity_type, entity_id);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Entry for a changed entity
    pub fn update<T: Serialize>(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: Option<&T>,
        after: &T,
    ) -> Self {
        let mut entry = Self::base(user_id, Operation::Update, entity_type, entity_id);
        entry.before = before.and_then(|b| serde_json::to_value(b).ok());
        entry.after = serde_json::to_value(after).ok();
        entry
    }

    /// Entry for a removed entity
    pub fn delete<T: Serialize>(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(user_id, Operation::Delete, entity_type, entity_id);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Format as a single log line
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "[{}] {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.user_id,
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(summary) = &self.summary {
            line.push_str(": ");
            line.push_str(summary);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid() -> UserId {
        UserId::parse("alice").unwrap()
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            &uid(),
            EntityType::ArchiveRecord,
            "2024-05",
            &json!({"expenses": 3}),
        );
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry_without_before() {
        let entry = AuditEntry::update::<String>(
            &uid(),
            EntityType::Marker,
            "marker",
            None,
            &"2024-06".to_string(),
        );
        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(json!("2024-06")));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::delete(&uid(), EntityType::Expense, "exp-1", &json!({}))
            .with_summary("archived");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"entity_type\":\"expense\""));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, Operation::Delete);
        assert_eq!(back.summary.as_deref(), Some("archived"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(&uid(), EntityType::Expense, "exp-12345678", &json!({}))
            .with_summary("Groceries $12.00");
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("alice CREATE Expense exp-12345678"));
        assert!(formatted.ends_with(": Groceries $12.00"));
    }
}
