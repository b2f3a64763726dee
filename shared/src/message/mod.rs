//! Realtime change notifications
//!
//! 数据变更事件: 每次 insert/update/delete 提交后由服务器发布，
//! 订阅者按 (table, filter) 接收，用于触发前端重新拉取。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of committed change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A committed row change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub table: String,
    pub event_type: ChangeKind,
    /// Row after the change (None for DELETE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    /// Row before the change (None for INSERT)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// Unix millis
    pub commit_timestamp: i64,
}

impl ChangeEvent {
    pub fn insert(table: &str, new: Value) -> Self {
        Self::build(table, ChangeKind::Insert, Some(new), None)
    }

    pub fn update(table: &str, old: Value, new: Value) -> Self {
        Self::build(table, ChangeKind::Update, Some(new), Some(old))
    }

    pub fn delete(table: &str, old: Value) -> Self {
        Self::build(table, ChangeKind::Delete, None, Some(old))
    }

    fn build(table: &str, event_type: ChangeKind, new: Option<Value>, old: Option<Value>) -> Self {
        Self {
            table: table.to_string(),
            event_type,
            new,
            old,
            commit_timestamp: crate::util::now_millis(),
        }
    }
}

/// Row filter of a subscription
///
/// `Eq` mirrors `column=eq.value` filters: it matches when either the new or
/// the old row carries `column == value` (compared on the string form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeFilter {
    All,
    Eq { column: String, value: String },
}

impl ChangeFilter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match self {
            Self::All => true,
            Self::Eq { column, value } => [&event.new, &event.old]
                .into_iter()
                .flatten()
                .filter_map(|row| row.get(column))
                .any(|v| match v {
                    Value::String(s) => s == value,
                    other => other.to_string() == *value,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_all_matches_everything() {
        let event = ChangeEvent::insert("menu", json!({"id": 1}));
        assert!(ChangeFilter::All.matches(&event));
    }

    #[test]
    fn test_filter_eq_on_number_column() {
        let event = ChangeEvent::insert("menu", json!({"id": 1, "establishment_id": 42}));
        assert!(ChangeFilter::eq("establishment_id", 42).matches(&event));
        assert!(!ChangeFilter::eq("establishment_id", 7).matches(&event));
    }

    #[test]
    fn test_filter_eq_uses_old_row_for_delete() {
        let event = ChangeEvent::delete("stock", json!({"id": 3, "unit": "kg"}));
        assert!(ChangeFilter::eq("unit", "kg").matches(&event));
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::update("product", json!({"id": 1}), json!({"id": 1}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventType"], "UPDATE");
        assert_eq!(value["table"], "product");
    }
}
