use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use podro_core::store::Schema;

use super::auth::check_auth;
use super::error::AppError;
use super::SharedState;

/// Display labels for the UI. Falls back to the built-in defaults when
/// the store has no `_schema` entry (or an unreadable one).
pub(super) async fn get_schema(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Schema>, AppError> {
    check_auth(&state.api_token, &headers)?;

    let store = state.store.read().await;
    Ok(Json(store.schema().await.unwrap_or_default()))
}
