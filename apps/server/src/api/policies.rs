use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use spendwise_core::policies::{NewPolicy, Policy, PolicyUpdate};
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

async fn list_policies(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Policy>>> {
    Ok(Json(state.policy_service.list_policies(&actor)?))
}

async fn create_policy(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(new_policy): Json<NewPolicy>,
) -> ApiResult<(StatusCode, Json<Policy>)> {
    let policy = state
        .policy_service
        .create_policy(&actor, new_policy)
        .await?;
    Ok((StatusCode::CREATED, Json(policy)))
}

async fn get_policy(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Policy>> {
    Ok(Json(state.policy_service.get_policy(&actor, &id)?))
}

async fn update_policy(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<PolicyUpdate>,
) -> ApiResult<Json<Policy>> {
    let policy = state
        .policy_service
        .update_policy(&actor, &id, update)
        .await?;
    Ok(Json(policy))
}

async fn delete_policy(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.policy_service.delete_policy(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/policies", get(list_policies).post(create_policy))
        .route(
            "/policies/{id}",
            get(get_policy).put(update_policy).delete(delete_policy),
        )
}
