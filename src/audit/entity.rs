use serde::Serialize;
use serde_json::{Map, Value};

use crate::audit::transform::DisplayTransform;

/// Read access to an object's attributes and relations. Relation targets
/// only need this trait; owners of audit history implement [`Auditable`].
pub trait Model: Send + Sync {
    fn attribute(&self, name: &str) -> Option<Value>;

    fn relation(&self, _name: &str) -> Option<&dyn Model> {
        None
    }

    /// Display transform this type applies to `attribute`, if any.
    fn display_transform(&self, _attribute: &str) -> Option<&DisplayTransform> {
        None
    }
}

/// A host entity whose create/update/delete events are audited.
pub trait Auditable: Model {
    /// Discriminator stored in `auditable_type`.
    fn auditable_type(&self) -> &str;

    fn table_name(&self) -> &str;

    fn primary_key(&self) -> i64;

    /// Value as last persisted. `None` for attributes never persisted.
    fn original(&self, column: &str) -> Option<Value>;

    fn audit_key(&self) -> Option<&str> {
        None
    }

    fn is_dirty(&self, column: &str) -> bool {
        self.attribute(column).unwrap_or(Value::Null)
            != self.original(column).unwrap_or(Value::Null)
    }
}

pub trait ActorContext: Send + Sync {
    fn current_user_id(&self) -> Option<i64>;
}

impl ActorContext for Option<i64> {
    fn current_user_id(&self) -> Option<i64> {
        *self
    }
}

/// Actor context for work done outside any authenticated request.
pub struct Anonymous;

impl ActorContext for Anonymous {
    fn current_user_id(&self) -> Option<i64> {
        None
    }
}

/// Original and current attribute maps of one entity, built from any
/// `Serialize` struct. Hosts embed it to implement [`Auditable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    original: Map<String, Value>,
    current: Map<String, Value>,
}

impl Snapshot {
    /// A freshly inserted entity: nothing was persisted before.
    pub fn created<T: Serialize>(current: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            original: Map::new(),
            current: to_map(current)?,
        })
    }

    pub fn updated<T: Serialize>(original: &T, current: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            original: to_map(original)?,
            current: to_map(current)?,
        })
    }

    /// An entity in its last persisted state: freshly loaded, or about to
    /// be deleted. Nothing is dirty.
    pub fn persisted<T: Serialize>(last: &T) -> Result<Self, serde_json::Error> {
        let map = to_map(last)?;
        Ok(Self {
            original: map.clone(),
            current: map,
        })
    }

    pub fn original(&self, column: &str) -> Option<Value> {
        self.original.get(column).cloned()
    }

    pub fn current(&self, column: &str) -> Option<Value> {
        self.current.get(column).cloned()
    }
}

fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
