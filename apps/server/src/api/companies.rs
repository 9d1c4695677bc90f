use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use spendwise_core::companies::{Company, CompanyUpdate};
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

async fn get_company(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Company>> {
    Ok(Json(state.company_service.get_company(&actor)?))
}

async fn update_company(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<CompanyUpdate>,
) -> ApiResult<Json<Company>> {
    let company = state.company_service.update_company(&actor, update).await?;
    Ok(Json(company))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/company", get(get_company).put(update_company))
}
