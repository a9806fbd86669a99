use std::sync::Arc;

use sqlx::PgPool;

use crate::audit::{AuditHooks, AuditRegistry};
use crate::config::Config;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    /// Postgres-backed hooks; the pool serves as both audit store and schema inspector.
    pub hooks: AuditHooks<PgPool, PgPool>,
}

impl AppState {
    pub fn registry(&self) -> &AuditRegistry {
        self.hooks.registry()
    }
}
