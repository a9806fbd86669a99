use sqlx::PgPool;

use crate::models::{Actor, AuditRecord, AuditWithActor, NewAuditRecord};

const SELECT_WITH_ACTOR: &str = "SELECT a.*, u.id AS actor_id, u.name AS actor_name, u.email AS actor_email
     FROM auditable_log a
     LEFT JOIN users u ON u.id = a.user_id";

#[derive(sqlx::FromRow)]
struct AuditActorRow {
    #[sqlx(flatten)]
    audit: AuditRecord,
    actor_id: Option<i64>,
    actor_name: Option<String>,
    actor_email: Option<String>,
}

impl From<AuditActorRow> for AuditWithActor {
    fn from(row: AuditActorRow) -> Self {
        let user = match (row.actor_id, row.actor_name, row.actor_email) {
            (Some(id), Some(name), Some(email)) => Some(Actor { id, name, email }),
            _ => None,
        };
        AuditWithActor {
            audit: row.audit,
            user,
        }
    }
}

/// Append one audit row. Accepts a pool or an open transaction so the
/// host can write the audit inside its own unit of work.
pub async fn insert<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    record: &NewAuditRecord,
) -> Result<AuditRecord, sqlx::Error> {
    sqlx::query_as::<_, AuditRecord>(
        "INSERT INTO auditable_log (auditable_type, auditable_id, user_id, key, old_value, new_value)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&record.auditable_type)
    .bind(record.auditable_id)
    .bind(record.user_id)
    .bind(&record.key)
    .bind(&record.old_value)
    .bind(&record.new_value)
    .fetch_one(executor)
    .await
}

pub async fn latest_simple_logs(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<AuditWithActor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AuditActorRow>(&format!(
        "{SELECT_WITH_ACTOR}
         WHERE a.auditable_type IS NULL
         ORDER BY a.created_at DESC, a.id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn latest_audits(pool: &PgPool, limit: i64) -> Result<Vec<AuditWithActor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AuditActorRow>(&format!(
        "{SELECT_WITH_ACTOR}
         WHERE a.auditable_type IS NOT NULL
         ORDER BY a.created_at DESC, a.id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn history_for(
    pool: &PgPool,
    auditable_type: &str,
    auditable_id: i64,
    limit: i64,
) -> Result<Vec<AuditWithActor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AuditActorRow>(&format!(
        "{SELECT_WITH_ACTOR}
         WHERE a.auditable_id = $1 AND a.auditable_type = $2
         ORDER BY a.created_at DESC, a.id DESC LIMIT $3"
    ))
    .bind(auditable_id)
    .bind(auditable_type)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<AuditWithActor>, sqlx::Error> {
    let row = sqlx::query_as::<_, AuditActorRow>(&format!("{SELECT_WITH_ACTOR} WHERE a.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}
