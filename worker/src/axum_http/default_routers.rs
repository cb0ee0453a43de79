use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use crates::infra::realtime::price_hub::PriceHub;
use serde_json::json;
use tracing::debug;

pub async fn not_found() -> impl IntoResponse {
    debug!("worker router: not_found handler invoked");
    (StatusCode::NOT_FOUND, "NOT_FOUND")
}

/// Reports how many socket sessions follow the hub and how many prices it holds.
pub async fn health_check(State(hub): State<PriceHub>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "socket_clients": hub.subscriber_count(),
            "prices": hub.snapshot().len(),
        })),
    )
}
