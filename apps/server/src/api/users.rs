use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use spendwise_core::users::{Actor, User, UserRoleUpdate};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.list_users(&actor)?))
}

async fn get_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&actor, &id)?))
}

async fn update_role(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<UserRoleUpdate>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.update_role(&actor, &id, update).await?;
    Ok(Json(user))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/role", put(update_role))
}
