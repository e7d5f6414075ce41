//! HTTP handlers for the upload and gallery endpoints.
//!
//! Handlers only pull the file out of the multipart body and shape the JSON
//! envelope; validation and storage live in `UploadService`.

use crate::{errors::AppError, services::upload_service::{UploadError, UploadService}};
use axum::{
    Json,
    extract::{Multipart, State},
    response::Html,
};
use bytes::Bytes;
use serde::Serialize;

#[derive(Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub url: String,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub ok: bool,
    pub gallery: Vec<String>,
}

/// `POST /api/v1/upload` — multipart image upload.
///
/// Expects a single form field named `file`; other fields are skipped. The
/// response is the public URL of the stored blob.
pub async fn upload(
    State(service): State<UploadService>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {err}")))?;

        upload = Some((filename, content_type, data));
        break;
    }

    let (filename, content_type, data) = upload.ok_or(UploadError::MissingFile)?;
    let blob = service
        .store_image(&filename, content_type.as_deref(), data)
        .await?;

    Ok(Json(UploadResponse {
        ok: true,
        url: blob.url,
    }))
}

/// `GET /api/v1/gallery` — every blob URL currently in the container.
///
/// Unpaginated by contract; the response grows with container population.
pub async fn gallery(
    State(service): State<UploadService>,
) -> Result<Json<GalleryResponse>, AppError> {
    let urls = service.gallery().await?;
    Ok(Json(GalleryResponse {
        ok: true,
        gallery: urls,
    }))
}

/// `GET /` — static landing page with an upload form and gallery view.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::routes::routes;
    use crate::services::container::testing::{MemoryContainer, TEST_BASE_URL};
    use crate::services::container::BlobContainer;
    use crate::services::upload_service::MAX_UPLOAD_BYTES;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn app(container: Arc<MemoryContainer>) -> Router {
        routes().with_state(UploadService::new(container))
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let app = app(Arc::new(MemoryContainer::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let container = Arc::new(MemoryContainer::default());
        let body = multipart_body("avatar", "photo.png", "image/png", b"png");
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "No file provided");
        assert_eq!(container.blob_count(), 0);
    }

    #[tokio::test]
    async fn upload_rejects_non_image_mime_type() {
        let container = Arc::new(MemoryContainer::default());
        let body = multipart_body("file", "notes.txt", "text/plain", b"hello");
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Only image uploads allowed");
        assert_eq!(container.blob_count(), 0);
    }

    #[tokio::test]
    async fn upload_rejects_payload_over_ten_mib() {
        let container = Arc::new(MemoryContainer::default());
        let body = multipart_body(
            "file",
            "huge.png",
            "image/png",
            &vec![0u8; MAX_UPLOAD_BYTES + 1],
        );
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "File too large (max 10MB)");
        assert_eq!(container.blob_count(), 0);
    }

    #[tokio::test]
    async fn valid_upload_stores_blob_and_returns_url() {
        let container = Arc::new(MemoryContainer::default());
        let body = multipart_body("file", "photo.png", "image/png", b"fake png bytes");
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);

        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with(&format!("{TEST_BASE_URL}/")));
        assert!(url.ends_with("-photo.png"));

        let names = container.list_blob_names().await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(url, container.blob_url(&names[0]));
    }

    #[tokio::test]
    async fn upload_sanitizes_path_traversal_filenames() {
        let container = Arc::new(MemoryContainer::default());
        let body = multipart_body("file", "../../etc/passwd", "image/png", b"x");
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let names = container.list_blob_names().await.unwrap();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("-etc_passwd"), "key was {}", names[0]);
        assert!(!names[0].contains('/'));
    }

    #[tokio::test]
    async fn gallery_returns_all_blob_urls() {
        let container = Arc::new(MemoryContainer::default());
        for name in ["20240101T000000-a.png", "20240101T000001-b.png"] {
            container
                .put_blob(name, "image/png", Bytes::from_static(b"x"))
                .await
                .unwrap();
        }

        let response = app(container)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/gallery")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        let mut urls: Vec<&str> = body["gallery"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        urls.sort_unstable();
        assert_eq!(
            urls,
            vec![
                format!("{TEST_BASE_URL}/20240101T000000-a.png"),
                format!("{TEST_BASE_URL}/20240101T000001-b.png"),
            ]
        );
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal_errors() {
        let container = Arc::new(MemoryContainer {
            fail_requests: true,
            ..Default::default()
        });

        let body = multipart_body("file", "photo.png", "image/png", b"x");
        let response = app(container.clone()).oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);

        let response = app(container)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/gallery")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn landing_page_is_served() {
        let app = app(Arc::new(MemoryContainer::default()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
