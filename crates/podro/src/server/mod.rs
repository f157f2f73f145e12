mod auth;
mod error;
mod schema;
mod store;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use podro_core::store::DataStore;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub store: Arc<RwLock<DataStore>>,
    pub api_token: String,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, origin: &str) -> Router {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches. Otherwise, omit the header entirely so browsers
    // get a clean CORS rejection instead of a mismatched origin value.
    let allowed: axum::http::HeaderValue = origin.parse().expect("valid origin header value");
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate({
            let allowed = allowed.clone();
            move |request_origin: &axum::http::HeaderValue, _| *request_origin == allowed
        }))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static("x-api-token"),
        ]);

    let shared = Arc::new(state);

    let public_api = Router::new().route("/api/v1/health", get(health));

    // Import replaces the whole document; cap the body so an oversized
    // upload cannot balloon memory.
    const IMPORT_BODY_LIMIT: usize = 2 * 1024 * 1024;

    let store_routes = Router::new()
        .route(
            "/api/v1/store",
            get(store::get_all_items).delete(store::clear_all_items),
        )
        .route("/api/v1/store/modules", get(store::list_modules))
        .route("/api/v1/store/export", get(store::export_store))
        .route(
            "/api/v1/store/import",
            post(store::import_store).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .route(
            "/api/v1/store/{module}/{key}",
            get(store::get_item)
                .post(store::set_item)
                .delete(store::delete_item),
        );

    let protected_api = Router::new()
        .route("/api/v1/schema", get(schema::get_schema))
        .merge(store_routes);

    Router::new()
        .merge(public_api)
        .merge(protected_api)
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(cors)
        .with_state(shared)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
