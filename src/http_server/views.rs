//! HTML views
//!
//! Compile-time templates from `templates/`, rendered with automatic
//! escaping.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// Container listing page
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView {
    pub container: String,
    pub objects: Vec<String>,
    pub notice: Option<String>,
}

/// Render a template, falling back to a plain 500 if rendering fails
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}
