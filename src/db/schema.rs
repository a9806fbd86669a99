use sqlx::PgPool;

/// Column names of `table` in ordinal order. `table` may be schema-qualified
/// (`billing.invoices`); otherwise the connection's current schema is used.
pub async fn list_columns(pool: &PgPool, table: &str) -> Result<Vec<String>, sqlx::Error> {
    let (schema, name) = match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    };

    sqlx::query_scalar::<_, String>(
        "SELECT column_name::text FROM information_schema.columns
         WHERE table_schema = COALESCE($1, current_schema()) AND table_name = $2
         ORDER BY ordinal_position",
    )
    .bind(schema)
    .bind(name)
    .fetch_all(pool)
    .await
}
