use std::any::Any;
use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use configs::ServerConfig;

use crate::errors::ApiError;
use crate::state::ServerState;

pub mod model;
pub mod training;

/// Successful response: `success: true` plus the payload's fields.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn not_found() -> ApiError {
    ApiError::UnknownRoute("Not found".into())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("internal server error: {detail}")).into_response()
}

/// JSON API routes only; body limit applied, no static files or outer layers.
pub fn api_router(state: ServerState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/training/save", post(training::save))
        .route("/api/training/save-chunk", post(training::save_chunk))
        .route("/api/training/load/:sample_type", get(training::load))
        .route("/api/training/count/:sample_type", get(training::count))
        .route("/api/training/progress", get(training::progress))
        .route("/api/training/reset/:target", delete(training::reset))
        .route("/api/training/clear/:sample_type", delete(training::clear))
        .route("/api/training/clear-before-save/:sample_type", post(training::clear))
        .route("/api/training/reset-ids", post(training::reset_ids))
        .route("/api/training/optimize", post(training::optimize))
        .route("/api/training/diagnostics", get(training::diagnostics))
        .route("/api/model/save", post(model::save))
        .route("/api/model/load/:sample_type", get(model::load))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .with_state(state)
}

/// HTML views under the static directory.
fn page_routes(static_dir: &str) -> Router {
    let dir = Path::new(static_dir);
    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .route_service("/training", ServeFile::new(dir.join("training.html")))
        .route_service("/training/alphabet", ServeFile::new(dir.join("training").join("alphabet.html")))
        .route_service("/training/numbers", ServeFile::new(dir.join("training").join("numbers.html")))
}

/// Build the full application router: API, views, static assets, JSON 404s.
pub fn build_router(state: ServerState, server: &ServerConfig, cors: CorsLayer) -> Router {
    let assets = ServeDir::new(&server.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    api_router(state, server.body_limit_bytes)
        .merge(page_routes(&server.static_dir))
        .fallback_service(assets)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
