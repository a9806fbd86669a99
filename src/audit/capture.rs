use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::entity::Auditable;
use crate::models::ColumnValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Created,
    Updated,
    Deleted,
}

impl LifecycleEvent {
    /// Audit key used when neither the caller nor the entity overrides it.
    pub fn default_key(self) -> &'static str {
        match self {
            LifecycleEvent::Created => "created",
            LifecycleEvent::Updated => "updated",
            LifecycleEvent::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_key())
    }
}

/// Old/new payloads of one lifecycle event. A side that does not apply to
/// the event (old on create, new on delete) is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub event: LifecycleEvent,
    pub old: Option<Vec<ColumnValue>>,
    pub new: Option<Vec<ColumnValue>>,
}

impl Diff {
    /// Columns named on either side, old side first.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for entry in self.old.iter().chain(self.new.iter()).flatten() {
            if !columns.contains(&entry.column.as_str()) {
                columns.push(&entry.column);
            }
        }
        columns
    }
}

/// Computes the diff `event` produced on `entity` over `columns`.
///
/// Returns `None` only for an update that touched no tracked column;
/// creates and deletes always yield a diff, possibly with empty payloads.
pub fn capture(event: LifecycleEvent, entity: &dyn Auditable, columns: &[String]) -> Option<Diff> {
    match event {
        LifecycleEvent::Created => Some(capture_created(entity, columns)),
        LifecycleEvent::Updated => capture_updated(entity, columns),
        LifecycleEvent::Deleted => Some(capture_deleted(entity, columns)),
    }
}

fn capture_created(entity: &dyn Auditable, columns: &[String]) -> Diff {
    let new = columns
        .iter()
        .filter_map(|column| match entity.attribute(column) {
            None | Some(Value::Null) => None,
            Some(value) => Some(ColumnValue::new(column.as_str(), value)),
        })
        .collect();

    Diff {
        event: LifecycleEvent::Created,
        old: None,
        new: Some(new),
    }
}

fn capture_updated(entity: &dyn Auditable, columns: &[String]) -> Option<Diff> {
    let mut old = Vec::new();
    let mut new = Vec::new();

    for column in columns.iter().filter(|c| entity.is_dirty(c)) {
        old.push(ColumnValue::new(
            column.as_str(),
            entity.original(column).unwrap_or(Value::Null),
        ));
        new.push(ColumnValue::new(
            column.as_str(),
            entity.attribute(column).unwrap_or(Value::Null),
        ));
    }

    if new.is_empty() {
        return None;
    }

    Some(Diff {
        event: LifecycleEvent::Updated,
        old: Some(old),
        new: Some(new),
    })
}

fn capture_deleted(entity: &dyn Auditable, columns: &[String]) -> Diff {
    let old = columns
        .iter()
        .map(|column| {
            let value = entity
                .original(column)
                .or_else(|| entity.attribute(column))
                .unwrap_or(Value::Null);
            ColumnValue::new(column.as_str(), value)
        })
        .collect();

    Diff {
        event: LifecycleEvent::Deleted,
        old: Some(old),
        new: None,
    }
}
