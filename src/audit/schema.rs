use async_trait::async_trait;
use sqlx::PgPool;

use crate::audit::error::Result;
use crate::db;

#[async_trait]
pub trait SchemaInspector: Send + Sync {
    async fn list_columns(&self, table: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl SchemaInspector for PgPool {
    async fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        let columns = db::schema::list_columns(self, table).await?;
        if columns.is_empty() {
            tracing::warn!(table, "Schema lists no columns; nothing will be tracked");
        }
        Ok(columns)
    }
}
