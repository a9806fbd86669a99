pub mod audits;
pub mod schema;
pub mod users;
