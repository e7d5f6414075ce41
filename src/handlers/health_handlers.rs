//! Health handler.
//!
//! - GET /api/v1/health -> liveness only

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `GET /api/v1/health`
///
/// Liveness probe. Always returns 200 with `{ok:true}` and performs no I/O;
/// store reachability is deliberately not checked here.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { ok: true }))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}
