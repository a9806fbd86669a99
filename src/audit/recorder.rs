use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::audit::capture::Diff;
use crate::audit::entity::{ActorContext, Auditable};
use crate::audit::error::Result;
use crate::db;
use crate::models::{AuditRecord, ColumnValue, NewAuditRecord};

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord>;
}

#[async_trait]
impl AuditStore for PgPool {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord> {
        Ok(db::audits::insert(self, &record).await?)
    }
}

/// Pretty-printed JSON array; an empty slice encodes as `[]`.
pub fn encode_entries(entries: &[ColumnValue]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn build_record(
    entity: &dyn Auditable,
    user_id: Option<i64>,
    key: &str,
    diff: &Diff,
) -> Result<NewAuditRecord> {
    Ok(NewAuditRecord {
        auditable_type: Some(entity.auditable_type().to_string()),
        auditable_id: Some(entity.primary_key()),
        user_id,
        key: key.to_string(),
        old_value: diff.old.as_deref().map(encode_entries).transpose()?,
        new_value: diff.new.as_deref().map(encode_entries).transpose()?,
    })
}

/// Persists one audit record for `diff`. Store failures are returned to the
/// caller untouched.
pub async fn record<S>(
    store: &S,
    entity: &dyn Auditable,
    actor: &dyn ActorContext,
    key: &str,
    diff: &Diff,
) -> Result<AuditRecord>
where
    S: AuditStore + ?Sized,
{
    let new = build_record(entity, actor.current_user_id(), key, diff)?;
    insert_logged(store, new).await
}

/// Persists an entry that is not scoped to any entity. Payloads are opaque.
pub async fn record_simple<S>(
    store: &S,
    actor: &dyn ActorContext,
    key: &str,
    old: Option<&Value>,
    new: Option<&Value>,
) -> Result<AuditRecord>
where
    S: AuditStore + ?Sized,
{
    let record = NewAuditRecord {
        auditable_type: None,
        auditable_id: None,
        user_id: actor.current_user_id(),
        key: key.to_string(),
        old_value: old.map(serde_json::to_string_pretty).transpose()?,
        new_value: new.map(serde_json::to_string_pretty).transpose()?,
    };
    insert_logged(store, record).await
}

async fn insert_logged<S>(store: &S, record: NewAuditRecord) -> Result<AuditRecord>
where
    S: AuditStore + ?Sized,
{
    let auditable_type = record.auditable_type.clone();
    let auditable_id = record.auditable_id;
    let key = record.key.clone();

    match store.insert(record).await {
        Ok(saved) => {
            tracing::info!(
                audit_id = saved.id,
                auditable_type = ?auditable_type,
                auditable_id = ?auditable_id,
                user_id = ?saved.user_id,
                key = %key,
                "Audit recorded"
            );
            Ok(saved)
        }
        Err(e) => {
            tracing::error!(
                auditable_type = ?auditable_type,
                auditable_id = ?auditable_id,
                key = %key,
                "Failed to record audit: {e}"
            );
            Err(e)
        }
    }
}

