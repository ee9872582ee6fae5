use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;
use service::items::ItemRepository;

use crate::errors::ApiError;
use crate::metrics;

pub mod items;

/// Shared handler state: the one item store, injected at startup.
#[derive(Clone)]
pub struct ServerState {
    pub items: Arc<dyn ItemRepository>,
}

impl ServerState {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics_handler() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Build the application router: item routes plus health and metrics probes.
pub fn build_router(state: ServerState) -> Router {
    let item_routes = Router::new()
        .route(
            "/items",
            get(items::list_items)
                .post(items::create_item)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/item",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        );

    let probes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler));

    item_routes
        .merge(probes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx only; client errors are logged by ApiError
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
