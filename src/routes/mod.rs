pub mod audits;
pub mod logs;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Audit listings
        .route("/api/v1/audits", get(audits::latest))
        .route("/api/v1/audits/simple", get(audits::latest_simple))
        .route(
            "/api/v1/audits/{auditable_type}/{auditable_id}",
            get(audits::history),
        )
        .route("/api/v1/audit-records/{id}", get(audits::get))
        // Simple logs
        .route("/api/v1/logs", post(logs::create))
}
