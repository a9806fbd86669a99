use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::audit::entity::Model;
use crate::audit::error::Result;
use crate::audit::options::AuditOptions;

/// Loads the owner behind an `(auditable_type, auditable_id)` reference.
#[async_trait]
pub trait EntityLoader: Send + Sync {
    async fn load(&self, pool: &PgPool, id: i64) -> Result<Option<Box<dyn Model>>>;
}

/// Audited entity types keyed by their discriminator. Built once at startup
/// and shared read-only afterwards.
///
/// Only types bound with [`register`](Self::register) are audited. A loader
/// on its own never opts a type in.
#[derive(Default)]
pub struct AuditRegistry {
    options: HashMap<String, AuditOptions>,
    loaders: HashMap<String, Arc<dyn EntityLoader>>,
}

impl AuditRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, auditable_type: &str, options: AuditOptions) -> &mut Self {
        self.options.insert(auditable_type.to_string(), options);
        self
    }

    pub fn register_loader(
        &mut self,
        auditable_type: &str,
        loader: Arc<dyn EntityLoader>,
    ) -> &mut Self {
        if !self.options.contains_key(auditable_type) {
            tracing::warn!(
                auditable_type,
                "Loader bound to a type that is not audited; history will use raw values only"
            );
        }
        self.loaders.insert(auditable_type.to_string(), loader);
        self
    }

    pub fn options(&self, auditable_type: &str) -> Option<&AuditOptions> {
        self.options.get(auditable_type)
    }

    pub fn loader(&self, auditable_type: &str) -> Option<&Arc<dyn EntityLoader>> {
        self.loaders.get(auditable_type)
    }

    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.options.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
