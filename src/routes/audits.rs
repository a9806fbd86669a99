use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::audit::history::{self, AuditView};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

pub const DEFAULT_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Requested limit clamped to `[1, max]`, 100 when absent.
    pub fn limit(&self, max: i64) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max.max(1))
    }
}

pub async fn latest(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AuditView>>, AppError> {
    let audits =
        db::audits::latest_audits(&state.pool, query.limit(state.config.max_limit)).await?;
    Ok(Json(history::present_all(audits)?))
}

pub async fn latest_simple(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AuditView>>, AppError> {
    let logs =
        db::audits::latest_simple_logs(&state.pool, query.limit(state.config.max_limit)).await?;
    Ok(Json(history::present_all(logs)?))
}

pub async fn history(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path((auditable_type, auditable_id)): Path<(String, i64)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AuditView>>, AppError> {
    let views = history::history(
        &state.pool,
        state.registry(),
        &auditable_type,
        auditable_id,
        query.limit(state.config.max_limit),
    )
    .await?;
    Ok(Json(views))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<AuditView>, AppError> {
    let entry = db::audits::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Audit record not found".to_string()))?;

    let view = history::present_loaded(&state.pool, state.registry(), entry).await?;
    Ok(Json(view))
}
