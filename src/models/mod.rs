pub mod audit_record;
pub mod user;

pub use audit_record::{AuditRecord, AuditWithActor, ColumnValue, NewAuditRecord};
pub use user::Actor;
