use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct UploadResponse {
    url: String,
}

async fn upload_receipt(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;
        let url = state.receipts.save(&content_type, &bytes).await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(ApiError::BadRequest(
        "Missing 'file' field in multipart request".to_string(),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload_receipt))
}
