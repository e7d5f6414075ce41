//! Defines the HTTP surface of the upload gateway.
//!
//! - `POST /api/v1/upload`  — multipart image upload
//! - `GET  /api/v1/gallery` — list every stored blob URL
//! - `GET  /api/v1/health`  — liveness probe
//! - `GET  /`               — landing page

use crate::{
    handlers::{
        health_handlers::health,
        upload_handlers::{gallery, index, upload},
    },
    services::upload_service::{MAX_UPLOAD_BYTES, UploadService},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Slack on top of the payload cap for multipart framing, so the service's
/// own size check produces the 400 instead of the framework's 413.
const BODY_LIMIT_SLACK_BYTES: usize = 1024 * 1024;

/// Build the router. The router carries shared state (`UploadService`) to
/// all handlers.
pub fn routes() -> Router<UploadService> {
    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/upload", post(upload))
        .route("/api/v1/gallery", get(gallery))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_SLACK_BYTES))
}
