use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    auth::{login, me, register, require_jwt},
    config::Config,
    main_lib::AppState,
    receipts::UPLOADS_PREFIX,
};

mod analytics;
mod budgets;
mod companies;
mod expenses;
mod health;
mod policies;
mod reports;
mod uploads;
mod users;
mod vendors;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Requests running past `timeout` are answered with 408.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let upload_limit = config.max_upload_bytes + MULTIPART_OVERHEAD;

    let public = Router::new()
        .merge(health::router())
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .merge(users::router())
        .merge(companies::router())
        .merge(expenses::router())
        .merge(budgets::router())
        .merge(policies::router())
        .merge(vendors::router())
        .merge(analytics::router())
        .merge(reports::router())
        .merge(uploads::router().layer(DefaultBodyLimit::max(upload_limit)))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = public.merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .nest_service(UPLOADS_PREFIX, ServeDir::new(state.receipts.dir()))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CompressionLayer::new())
        .layer(timeout_layer(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
