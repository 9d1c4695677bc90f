use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use spendwise_core::budgets::{BudgetUpdate, BudgetWithStatus, NewBudget};
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<BudgetWithStatus>>> {
    Ok(Json(state.budget_service.list_budgets(&actor)?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(new_budget): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<BudgetWithStatus>)> {
    let budget = state
        .budget_service
        .create_budget(&actor, new_budget)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<BudgetWithStatus>> {
    Ok(Json(state.budget_service.get_budget(&actor, &id)?))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<BudgetUpdate>,
) -> ApiResult<Json<BudgetWithStatus>> {
    let budget = state
        .budget_service
        .update_budget(&actor, &id, update)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.budget_service.delete_budget(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn recalculate_budgets(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<BudgetWithStatus>>> {
    Ok(Json(state.budget_service.recalculate_all(&actor).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/recalculate", post(recalculate_budgets))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}
