use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use spendwise_storage_sqlite::get_connection;

use crate::main_lib::AppState;

async fn healthz() -> &'static str {
    "ok"
}

/// Ready once the pool can hand out a database connection.
async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    let pool = state.pool.clone();
    let ready = tokio::task::spawn_blocking(move || get_connection(&pool).is_ok())
        .await
        .unwrap_or(false);
    if ready {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!("Readiness check failed: database unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
