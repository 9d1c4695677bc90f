use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use spendwise_core::users::Actor;
use spendwise_core::vendors::{Vendor, VendorAnalytics};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_vendors(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Vendor>>> {
    Ok(Json(state.vendor_service.list_vendors(&actor)?))
}

async fn vendor_analytics(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<VendorAnalytics>> {
    Ok(Json(state.vendor_service.vendor_analytics(&actor)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vendors", get(list_vendors))
        .route("/vendors/analytics", get(vendor_analytics))
}
