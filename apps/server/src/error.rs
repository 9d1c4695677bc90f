use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spendwise_core::errors::{DatabaseError, Error as CoreError};
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::Validation(_) | CoreError::InvalidState(_) => StatusCode::BAD_REQUEST,
        CoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        CoreError::Conflict(_) | CoreError::Database(DatabaseError::UniqueViolation(_)) => {
            StatusCode::CONFLICT
        }
        CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(format!("Failed to read multipart field: {}", err.body_text()))
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::WeakPassword => ApiError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_core_errors_to_statuses() {
        let cases = [
            (CoreError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (
                CoreError::InvalidState("approved".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::PermissionDenied("no".into()),
                StatusCode::FORBIDDEN,
            ),
            (CoreError::NotFound("Expense".into()), StatusCode::NOT_FOUND),
            (
                CoreError::Database(DatabaseError::NotFound("row".into())),
                StatusCode::NOT_FOUND,
            ),
            (CoreError::Conflict("decided".into()), StatusCode::CONFLICT),
            (
                CoreError::Database(DatabaseError::UniqueViolation("email".into())),
                StatusCode::CONFLICT,
            ),
            (
                CoreError::Report("pdf".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[test]
    fn upload_errors_have_their_own_statuses() {
        assert_eq!(
            ApiError::PayloadTooLarge("too big".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Unauthorized("token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
