//! HTTP Front-End Tests
//!
//! Drives the full router in-process against an in-memory container:
//! - Listing reflects exactly the objects in the container
//! - Upload overwrites, sanitizes names and validates the form
//! - Buffered download returns the uploaded bytes exactly
//! - Notices are shown once after a redirect

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use blobdeck::file_storage::{ObjectStoreBackend, StorageBackend};
use blobdeck::http_server::flash::take_notice;
use blobdeck::http_server::{HttpServer, HttpServerConfig};
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

const BOUNDARY: &str = "----blobdeck-test-boundary";

/// One multipart part: (field name, optional filename, content)
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn create_app() -> (Router, Arc<ObjectStoreBackend>) {
    create_app_with(HttpServerConfig::default())
}

fn create_app_with(config: HttpServerConfig) -> (Router, Arc<ObjectStoreBackend>) {
    let backend = Arc::new(ObjectStoreBackend::in_memory("uploads"));
    let router = HttpServer::with_config(config, backend.clone()).router();
    (router, backend)
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, f
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::post("/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

/// Notice carried by a redirect's `Set-Cookie`, as the browser would send it back
fn notice_of(response: &Response) -> Option<String> {
    let set_cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let pair = set_cookie.split(';').next()?;
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(pair).ok()?);
    take_notice(&headers)
}

async fn put(backend: &ObjectStoreBackend, name: &str, content: &'static [u8]) {
    let body = stream::iter(vec![Ok(Bytes::from_static(content))]).boxed();
    backend.write(name, body).await.unwrap();
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_shows_every_object() {
    let (app, backend) = create_app();
    put(&backend, "alpha.txt", b"a").await;
    put(&backend, "nested/beta.bin", b"b").await;

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("alpha.txt"));
    assert!(html.contains("href=\"/download/nested/beta.bin\""));
    assert!(html.contains("href=\"/stream-download/alpha.txt\""));
}

#[tokio::test]
async fn test_listing_of_empty_container() {
    let (app, _backend) = create_app();

    let html = body_text(send(&app, get("/")).await).await;
    assert!(html.contains("The container is empty."));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_then_list_and_download() {
    let (app, backend) = create_app();

    let response = send(
        &app,
        upload_request(&[("file", Some("report.csv"), b"a,b\n1,2\n")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    assert_eq!(notice_of(&response).as_deref(), Some("Uploaded report.csv"));

    assert_eq!(backend.list().await.unwrap(), vec!["report.csv".to_string()]);

    let html = body_text(send(&app, get("/")).await).await;
    assert!(html.contains("report.csv"));

    let response = send(&app, get("/download/report.csv")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=report.csv"
    );
    assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
    assert_eq!(&body_bytes(response).await[..], b"a,b\n1,2\n");

    // Streamed download stays generic binary
    let response = send(&app, get("/stream-download/report.csv")).await;
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
}

#[tokio::test]
async fn test_upload_overwrites_existing_object() {
    let (app, backend) = create_app();

    send(&app, upload_request(&[("file", Some("notes.txt"), b"first")])).await;
    send(&app, upload_request(&[("file", Some("notes.txt"), b"second")])).await;

    assert_eq!(backend.list().await.unwrap().len(), 1);
    let response = send(&app, get("/download/notes.txt")).await;
    assert_eq!(&body_bytes(response).await[..], b"second");
}

#[tokio::test]
async fn test_upload_empty_file_round_trips() {
    let (app, _backend) = create_app();

    send(&app, upload_request(&[("file", Some("empty.dat"), b"")])).await;

    let response = send(&app, get("/download/empty.dat")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_upload_sanitizes_traversal() {
    let (app, backend) = create_app();

    let response = send(
        &app,
        upload_request(&[("file", Some("../../etc/passwd"), b"root:x:0:0")]),
    )
    .await;
    assert_eq!(notice_of(&response).as_deref(), Some("Uploaded etc_passwd"));
    assert_eq!(backend.list().await.unwrap(), vec!["etc_passwd".to_string()]);
}

#[tokio::test]
async fn test_upload_skips_other_fields() {
    let (app, backend) = create_app();

    send(
        &app,
        upload_request(&[
            ("comment", None, b"hello"),
            ("file", Some("data.bin"), b"\x00\x01\x02"),
        ]),
    )
    .await;

    assert_eq!(&backend.read_all("data.bin").await.unwrap()[..], b"\x00\x01\x02");
}

// =============================================================================
// Upload Validation (no storage write)
// =============================================================================

#[tokio::test]
async fn test_missing_file_part() {
    let (app, backend) = create_app();

    let response = send(&app, upload_request(&[("comment", None, b"no file here")])).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(notice_of(&response).as_deref(), Some("No file part"));
    assert!(backend.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_field_without_filename_is_not_a_file_part() {
    let (app, backend) = create_app();

    let response = send(&app, upload_request(&[("file", None, b"plain value")])).await;
    assert_eq!(notice_of(&response).as_deref(), Some("No file part"));
    assert!(backend.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_filename() {
    let (app, backend) = create_app();

    let response = send(&app, upload_request(&[("file", Some(""), b"")])).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(notice_of(&response).as_deref(), Some("No selected file"));
    assert!(backend.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filename_that_sanitizes_to_nothing() {
    let (app, backend) = create_app();

    let response = send(&app, upload_request(&[("file", Some("../.."), b"x")])).await;
    assert_eq!(notice_of(&response).as_deref(), Some("Invalid file name"));
    assert!(backend.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_multipart_post() {
    let (app, backend) = create_app();

    let request = Request::post("/upload")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("file=report.csv"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(notice_of(&response).as_deref(), Some("No file part"));
    assert!(backend.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_over_body_limit_writes_nothing() {
    let (app, backend) = create_app_with(HttpServerConfig {
        max_upload_bytes: 1024,
        ..Default::default()
    });

    let big = vec![b'z'; 64 * 1024];
    let response = send(&app, upload_request(&[("file", Some("big.bin"), &big)])).await;
    assert!(response.status().is_client_error());
    assert!(backend.list().await.unwrap().is_empty());
}

// =============================================================================
// Notices
// =============================================================================

#[tokio::test]
async fn test_notice_rendered_once_then_cleared() {
    let (app, _backend) = create_app();

    let redirect = send(&app, upload_request(&[("file", Some("a.txt"), b"a")])).await;
    let cookie = redirect.headers()[SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let request = Request::get("/")
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    let clear = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(clear.starts_with("notice=;"));
    assert!(clear.contains("Max-Age=0"));
    assert!(body_text(response).await.contains("Uploaded a.txt"));

    // Without the cookie the notice is gone
    let html = body_text(send(&app, get("/")).await).await;
    assert!(!html.contains("Uploaded a.txt"));
}

// =============================================================================
// Download Errors
// =============================================================================

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let (app, _backend) = create_app();

    let response = send(&app, get("/download/missing.txt")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/stream-download/missing.txt")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_object_name_is_bad_request() {
    let (app, _backend) = create_app();

    let response = send(&app, get("/download/a/../b")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _backend) = create_app();

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}
