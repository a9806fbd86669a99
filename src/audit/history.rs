use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::audit::entity::Model;
use crate::audit::error::Result;
use crate::audit::options::AuditOptions;
use crate::audit::registry::AuditRegistry;
use crate::audit::resolver::ValueResolver;
use crate::db;
use crate::models::{Actor, AuditWithActor, ColumnValue};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeView {
    pub column: String,
    pub label: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditView {
    pub id: i64,
    pub auditable_type: Option<String>,
    pub auditable_id: Option<i64>,
    pub user_id: Option<i64>,
    pub key: String,
    pub user: Option<Actor>,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub changes: Vec<ChangeView>,
    pub created_at: DateTime<Utc>,
}

/// Decodes `entry` and pairs its old/new entries by column.
///
/// Values go through the type's value resolver when both `options` and the
/// loaded `owner` are available; otherwise stored values are shown as-is.
/// Payloads that are not `{column, value}` arrays produce no changes.
pub fn present(
    entry: AuditWithActor,
    options: Option<&AuditOptions>,
    owner: Option<&dyn Model>,
) -> Result<AuditView> {
    let old_value = entry.audit.old_payload()?;
    let new_value = entry.audit.new_payload()?;

    let mut paired: Vec<(String, Option<Value>, Option<Value>)> = Vec::new();
    for item in column_entries(old_value.as_ref()) {
        match paired.iter_mut().find(|(c, _, _)| *c == item.column) {
            Some(slot) => slot.1 = Some(item.value),
            None => paired.push((item.column, Some(item.value), None)),
        }
    }
    for item in column_entries(new_value.as_ref()) {
        match paired.iter_mut().find(|(c, _, _)| *c == item.column) {
            Some(slot) => slot.2 = Some(item.value),
            None => paired.push((item.column, None, Some(item.value))),
        }
    }

    let resolver = options.map(ValueResolver::new);
    let mut changes = Vec::with_capacity(paired.len());
    for (column, old, new) in paired {
        let (label, old, new) = match (&resolver, owner) {
            (Some(resolver), Some(owner)) => (
                resolver.label(&column).to_string(),
                old.map(|v| resolver.resolve(&column, owner, v)).transpose()?,
                new.map(|v| resolver.resolve(&column, owner, v)).transpose()?,
            ),
            (Some(resolver), None) => (resolver.label(&column).to_string(), old, new),
            (None, _) => (column.clone(), old, new),
        };
        changes.push(ChangeView {
            column,
            label,
            old,
            new,
        });
    }

    Ok(AuditView {
        id: entry.audit.id,
        auditable_type: entry.audit.auditable_type,
        auditable_id: entry.audit.auditable_id,
        user_id: entry.audit.user_id,
        key: entry.audit.key,
        user: entry.user,
        old_value,
        new_value,
        changes,
        created_at: entry.audit.created_at,
    })
}

/// Decoded listing entries. Values are shown as stored, without loading owners.
pub fn present_all(entries: Vec<AuditWithActor>) -> Result<Vec<AuditView>> {
    entries
        .into_iter()
        .map(|entry| present(entry, None, None))
        .collect()
}

fn column_entries(payload: Option<&Value>) -> Vec<ColumnValue> {
    payload
        .and_then(|v| serde_json::from_value::<Vec<ColumnValue>>(v.clone()).ok())
        .unwrap_or_default()
}

pub async fn history(
    pool: &PgPool,
    registry: &AuditRegistry,
    auditable_type: &str,
    auditable_id: i64,
    limit: i64,
) -> Result<Vec<AuditView>> {
    let entries = db::audits::history_for(pool, auditable_type, auditable_id, limit).await?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let owner = load_owner(pool, registry, auditable_type, auditable_id).await?;
    let options = registry.options(auditable_type);

    entries
        .into_iter()
        .map(|entry| present(entry, options, owner.as_deref()))
        .collect()
}

pub async fn present_loaded(
    pool: &PgPool,
    registry: &AuditRegistry,
    entry: AuditWithActor,
) -> Result<AuditView> {
    let (Some(auditable_type), Some(auditable_id)) =
        (entry.audit.auditable_type.clone(), entry.audit.auditable_id)
    else {
        return present(entry, None, None);
    };

    let owner = load_owner(pool, registry, &auditable_type, auditable_id).await?;
    present(entry, registry.options(&auditable_type), owner.as_deref())
}

async fn load_owner(
    pool: &PgPool,
    registry: &AuditRegistry,
    auditable_type: &str,
    auditable_id: i64,
) -> Result<Option<Box<dyn Model>>> {
    match registry.loader(auditable_type) {
        Some(loader) => loader.load(pool, auditable_id).await,
        None => Ok(None),
    }
}
