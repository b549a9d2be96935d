//! Shared HTTP plumbing for both services

use crate::middleware::request_logging;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Plain `{detail}` message body
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Add `/health` and the common middleware stack to a service router
pub fn finish(router: Router) -> Router {
    router
        .route("/health", get(health_check))
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
