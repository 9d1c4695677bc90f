use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use spendwise_core::analytics::Dashboard;
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.analytics_service.dashboard(&actor)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/analytics/dashboard", get(dashboard))
}
