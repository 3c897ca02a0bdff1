//! Storage HTTP Routes
//!
//! The browser-facing front-end: container listing, upload, buffered and
//! streamed downloads.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use futures_util::{StreamExt, TryStreamExt};
use tracing::{debug, error, info, warn};

use crate::file_storage::{secure_filename, StorageBackend, StorageError};

use super::flash::{clear_notice_cookie, redirect_with_notice, take_notice};
use super::views::{render_template, IndexView};

const NO_FILE_PART: &str = "No file part";
const NO_SELECTED_FILE: &str = "No selected file";
const INVALID_FILE_NAME: &str = "Invalid file name";
const OCTET_STREAM: &str = "application/octet-stream";

// ==================
// Shared State
// ==================

/// Storage state shared across handlers
pub struct StorageState {
    pub backend: Arc<dyn StorageBackend>,
}

impl StorageState {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }
}

// ==================
// Storage Routes
// ==================

/// Create storage routes
pub fn storage_routes(state: Arc<StorageState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/upload", post(upload_handler))
        .route("/download/*name", get(download_handler))
        .route("/stream-download/*name", get(stream_download_handler))
        .with_state(state)
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            // Backend details stay in the log
            error!(error = %self, "storage request failed");
            (status, "Storage backend error").into_response()
        } else {
            debug!(error = %self, "storage request rejected");
            (status, self.to_string()).into_response()
        }
    }
}

// ==================
// Helper Functions
// ==================

/// `Content-Disposition` suggesting `name` as the download filename.
///
/// Plain token names are sent bare; anything else is quoted with an
/// RFC 5987 `filename*` for non-ASCII names.
pub fn content_disposition(name: &str) -> HeaderValue {
    let is_token = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b'\\' | b';' | b','));

    let value = if is_token {
        format!("attachment; filename={}", name)
    } else {
        let fallback: String = name
            .chars()
            .map(|c| match c {
                '"' | '\\' => '_',
                c if c.is_ascii() && !c.is_ascii_control() => c,
                _ => '_',
            })
            .collect();

        if name.is_ascii() {
            format!("attachment; filename=\"{}\"", fallback)
        } else {
            format!(
                "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                fallback,
                encode_ext_value(name)
            )
        }
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Percent-encode everything outside RFC 5987 `attr-char`
fn encode_ext_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Content type for a buffered download, guessed from the object name
fn guessed_content_type(name: &str) -> HeaderValue {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM))
}

fn attachment(name: &str, content_type: HeaderValue, body: Body) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_DISPOSITION, content_disposition(name));
    (headers, body).into_response()
}

// ==================
// Handlers
// ==================

async fn index_handler(
    State(state): State<Arc<StorageState>>,
    headers: HeaderMap,
) -> Result<Response, StorageError> {
    let objects = state.backend.list().await?;
    let notice = take_notice(&headers);
    let had_notice = notice.is_some();

    let mut response = render_template(IndexView {
        container: state.backend.container().to_string(),
        objects,
        notice,
    });

    if had_notice {
        response
            .headers_mut()
            .insert(SET_COOKIE, clear_notice_cookie());
    }

    Ok(response)
}

async fn upload_handler(
    State(state): State<Arc<StorageState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, StorageError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(reason = %rejection, "upload without a multipart body");
            return Ok(redirect_with_notice("/", NO_FILE_PART));
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Ok(e.into_response());
            }
        };

        // Only a part named `file` that carries a filename counts as a file part
        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if file_name.is_empty() {
            return Ok(redirect_with_notice("/", NO_SELECTED_FILE));
        }

        let name = secure_filename(&file_name);
        if name.is_empty() {
            info!(file_name = %file_name, "rejected upload with unusable filename");
            return Ok(redirect_with_notice("/", INVALID_FILE_NAME));
        }

        let body = field
            .map_err(|e| StorageError::Body(e.body_text()))
            .boxed();
        let size = state.backend.write(&name, body).await?;

        info!(object = %name, size, "uploaded object");
        return Ok(redirect_with_notice("/", &format!("Uploaded {}", name)));
    }

    Ok(redirect_with_notice("/", NO_FILE_PART))
}

async fn download_handler(
    State(state): State<Arc<StorageState>>,
    Path(name): Path<String>,
) -> Result<Response, StorageError> {
    let data = state.backend.read_all(&name).await?;
    Ok(attachment(&name, guessed_content_type(&name), Body::from(data)))
}

async fn stream_download_handler(
    State(state): State<Arc<StorageState>>,
    Path(name): Path<String>,
) -> Result<Response, StorageError> {
    let chunks = state.backend.read_chunks(&name).await?;
    debug!(object = %name, "streaming object");
    Ok(attachment(
        &name,
        HeaderValue::from_static(OCTET_STREAM),
        Body::from(chunks),
    ))
}
