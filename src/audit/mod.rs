//! Change capture and audit recording for host entities.
//!
//! A host registers its audited types in an [`AuditRegistry`], then calls
//! the matching [`AuditHooks`] handler after each create, update or delete.
//! The hook computes the diff over the type's tracked columns and appends
//! one row to `auditable_log`.

pub mod capture;
pub mod entity;
pub mod error;
pub mod history;
pub mod hooks;
pub mod options;
pub mod recorder;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod transform;

pub use capture::{capture, Diff, LifecycleEvent};
pub use entity::{ActorContext, Anonymous, Auditable, Model, Snapshot};
pub use error::{AuditError, ResolutionError};
pub use hooks::AuditHooks;
pub use options::{AuditOptions, ColumnPolicy};
pub use recorder::AuditStore;
pub use registry::{AuditRegistry, EntityLoader};
pub use resolver::ValueResolver;
pub use schema::SchemaInspector;
pub use transform::DisplayTransform;
