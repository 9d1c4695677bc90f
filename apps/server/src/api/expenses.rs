use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use spendwise_core::expenses::{Approval, Expense, ExpenseFilter, ExpenseUpdate, NewExpense};
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize, Default)]
struct ApproveBody {
    #[serde(default)]
    comments: Option<String>,
}

#[derive(Deserialize)]
struct RejectBody {
    reason: String,
}

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.expense_service.list_expenses(&actor, filter)?))
}

async fn submit_expense(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(new_expense): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = state
        .expense_service
        .submit_expense(&actor, new_expense)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn get_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.expense_service.get_expense(&actor, &id)?))
}

async fn update_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<ExpenseUpdate>,
) -> ApiResult<Json<Expense>> {
    let expense = state
        .expense_service
        .update_expense(&actor, &id, update)
        .await?;
    Ok(Json(expense))
}

async fn delete_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.expense_service.delete_expense(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    body: Option<Json<ApproveBody>>,
) -> ApiResult<Json<Expense>> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let expense = state
        .expense_service
        .approve_expense(&actor, &id, body.comments)
        .await?;
    Ok(Json(expense))
}

async fn reject_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<Expense>> {
    let expense = state
        .expense_service
        .reject_expense(&actor, &id, body.reason)
        .await?;
    Ok(Json(expense))
}

async fn list_approvals(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Approval>>> {
    Ok(Json(state.expense_service.list_approvals(&actor, &id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses).post(submit_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/{id}/approve", post(approve_expense))
        .route("/expenses/{id}/reject", post(reject_expense))
        .route("/expenses/{id}/approvals", get(list_approvals))
}
