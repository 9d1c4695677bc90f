use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use spendwise_core::expenses::ExpenseFilter;
use spendwise_core::reports::ReportFormat;
use spendwise_core::users::Actor;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct FormatQuery {
    #[serde(default)]
    format: Option<String>,
}

async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<ExpenseFilter>,
    Query(query): Query<FormatQuery>,
) -> ApiResult<impl IntoResponse> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => ReportFormat::default(),
    };
    let report = state
        .report_service
        .export_expenses(&actor, filter, format)?;
    tracing::info!(
        "Exported {} ({} bytes) for {}",
        report.filename,
        report.bytes.len(),
        actor.user_id
    );

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reports/expenses", get(export_expenses))
}
