use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::audit::history::{self, AuditView};
use crate::audit::recorder;
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateLog {
    pub key: String,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
}

/// Records an entry not tied to any entity, with the caller as actor.
pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateLog>,
) -> Result<Json<AuditView>, AppError> {
    let key = req.key.trim();
    if key.is_empty() || key.chars().count() > 255 {
        return Err(AppError::BadRequest(
            "Key must be between 1 and 255 characters".to_string(),
        ));
    }

    let record = recorder::record_simple(
        state.hooks.store(),
        &auth,
        key,
        req.old_value.as_ref(),
        req.new_value.as_ref(),
    )
    .await?;

    let entry = db::audits::find_by_id(&state.pool, record.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Audit record {} vanished", record.id)))?;

    Ok(Json(history::present(entry, None, None)?))
}
