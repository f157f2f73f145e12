use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use podro_core::{CoreError, StoreError};

// ==============================================================================
// Error Type
// ==============================================================================

pub(crate) enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    StorageFull(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::StorageFull(msg) => (StatusCode::INSUFFICIENT_STORAGE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub(super) fn map_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::EmptyModule
        | StoreError::EmptyKey
        | StoreError::RootNotObject
        | StoreError::Parse { .. } => AppError::BadRequest(err.to_string()),
        StoreError::Core(CoreError::QuotaExceeded { .. }) => {
            AppError::StorageFull(err.to_string())
        }
        StoreError::Core(core) => AppError::Internal(core.to_string()),
    }
}
