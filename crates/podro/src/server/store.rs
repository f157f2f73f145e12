use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::auth::check_auth;
use super::error::{map_store_error, AppError};
use super::SharedState;

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct SetItemRequest {
    value: serde_json::Value,
}

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn get_all_items(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.read().await;
    Ok(Json(serde_json::Value::Object(store.all_items().await)))
}

pub(super) async fn list_modules(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.read().await;
    Ok(Json(store.module_names().await))
}

pub(super) async fn get_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((module, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.read().await;
    let value = store
        .get_item(&module, &key)
        .await
        .map_err(map_store_error)?;

    value
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no value stored at {module}/{key}")))
}

pub(super) async fn set_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((module, key)): Path<(String, String)>,
    req: Result<Json<SetItemRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;

    let store = state.store.write().await;
    store
        .set_item(&module, &key, req.value)
        .await
        .map_err(map_store_error)?;

    Ok(Json(serde_json::json!({ "status": "stored" })))
}

pub(super) async fn delete_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((module, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.write().await;
    store
        .delete_item(&module, &key)
        .await
        .map_err(map_store_error)?;

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub(super) async fn clear_all_items(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.write().await;
    store.clear_all().await.map_err(map_store_error)?;

    Ok(Json(serde_json::json!({ "status": "cleared" })))
}

pub(super) async fn export_store(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.read().await;
    let export = store.export_json().await;

    let mut response = (StatusCode::OK, export.bytes).into_response();
    response.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/json; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    let disposition_header = axum::http::HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::Internal(format!("invalid content disposition header: {e}")))?;
    response
        .headers_mut()
        .insert(axum::http::header::CONTENT_DISPOSITION, disposition_header);
    Ok(response)
}

pub(super) async fn import_store(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.write().await;
    store.import_json(&body).await.map_err(map_store_error)?;
    let modules = store.module_names().await.len();

    Ok(Json(
        serde_json::json!({ "status": "imported", "modules": modules }),
    ))
}
