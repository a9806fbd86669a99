pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::audit::{AuditHooks, AuditRegistry};
use crate::config::Config;
use crate::state::{AppState, SharedState};

/// Builds the shared state around `registry`. Hosts keep a clone of the
/// returned state to call the audit hooks from their own handlers.
pub fn build_state(pool: PgPool, config: Config, registry: AuditRegistry) -> SharedState {
    for auditable_type in registry.types() {
        tracing::info!(auditable_type, "Auditing entity type");
    }

    let hooks = AuditHooks::new(Arc::new(registry), pool.clone(), pool.clone());

    Arc::new(AppState {
        pool,
        config,
        hooks,
    })
}

pub fn build_app(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("cache-control"),
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
