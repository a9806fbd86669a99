use std::sync::Arc;

use crate::audit::capture::{capture, LifecycleEvent};
use crate::audit::entity::{ActorContext, Auditable};
use crate::audit::error::Result;
use crate::audit::recorder::{self, AuditStore};
use crate::audit::registry::AuditRegistry;
use crate::audit::schema::SchemaInspector;
use crate::models::AuditRecord;

/// Create/update/delete handlers for every registered entity type.
///
/// The host calls the matching handler right after its mutation is durable
/// and awaits it before reporting success; any error fails the operation.
pub struct AuditHooks<S, I> {
    registry: Arc<AuditRegistry>,
    store: S,
    schema: I,
}

impl<S, I> AuditHooks<S, I>
where
    S: AuditStore,
    I: SchemaInspector,
{
    pub fn new(registry: Arc<AuditRegistry>, store: S, schema: I) -> Self {
        Self {
            registry,
            store,
            schema,
        }
    }

    pub fn registry(&self) -> &AuditRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn created(
        &self,
        entity: &dyn Auditable,
        actor: &dyn ActorContext,
    ) -> Result<Option<AuditRecord>> {
        self.handle(LifecycleEvent::Created, entity, actor).await
    }

    /// Records nothing when no tracked column changed.
    pub async fn updated(
        &self,
        entity: &dyn Auditable,
        actor: &dyn ActorContext,
    ) -> Result<Option<AuditRecord>> {
        self.handle(LifecycleEvent::Updated, entity, actor).await
    }

    pub async fn deleted(
        &self,
        entity: &dyn Auditable,
        actor: &dyn ActorContext,
    ) -> Result<Option<AuditRecord>> {
        self.handle(LifecycleEvent::Deleted, entity, actor).await
    }

    /// Returns `None` for unregistered types and for updates without changes.
    pub async fn handle(
        &self,
        event: LifecycleEvent,
        entity: &dyn Auditable,
        actor: &dyn ActorContext,
    ) -> Result<Option<AuditRecord>> {
        let auditable_type = entity.auditable_type();
        let Some(options) = self.registry.options(auditable_type) else {
            tracing::debug!(auditable_type, %event, "Type is not audited, skipping");
            return Ok(None);
        };

        let columns = options
            .tracked_columns(&self.schema, entity.table_name())
            .await?;

        let Some(diff) = capture(event, entity, &columns) else {
            tracing::debug!(
                auditable_type,
                auditable_id = entity.primary_key(),
                "No tracked column changed, skipping"
            );
            return Ok(None);
        };

        let key = entity.audit_key().unwrap_or(event.default_key());
        let record = recorder::record(&self.store, entity, actor, key, &diff).await?;
        Ok(Some(record))
    }
}
