use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Actor;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub auditable_type: Option<String>,
    pub auditable_id: Option<i64>,
    pub user_id: Option<i64>,
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn old_payload(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        decode(self.old_value.as_deref())
    }

    pub fn new_payload(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        decode(self.new_value.as_deref())
    }

    pub fn is_simple_log(&self) -> bool {
        self.auditable_type.is_none()
    }
}

fn decode(raw: Option<&str>) -> Result<Option<serde_json::Value>, serde_json::Error> {
    raw.map(serde_json::from_str).transpose()
}

/// Insert payload for `auditable_log`. Timestamps and id come from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    pub auditable_type: Option<String>,
    pub auditable_id: Option<i64>,
    pub user_id: Option<i64>,
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub column: String,
    pub value: serde_json::Value,
}

impl ColumnValue {
    pub fn new(column: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditWithActor {
    #[serde(flatten)]
    pub audit: AuditRecord,
    pub user: Option<Actor>,
}
