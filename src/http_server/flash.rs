//! One-shot notices carried across a redirect.
//!
//! The upload handler sets a `notice` cookie and redirects to the listing;
//! the listing renders the notice once and clears the cookie.

use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Cookie carrying the pending notice
pub const NOTICE_COOKIE: &str = "notice";

const CLEAR_COOKIE: &str = "notice=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

/// `Set-Cookie` value storing `message` until the next page view
pub fn notice_cookie(message: &str) -> HeaderValue {
    let encoded = URL_SAFE_NO_PAD.encode(message.as_bytes());
    // base64url output is always a valid header value
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        NOTICE_COOKIE, encoded
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(CLEAR_COOKIE))
}

/// `Set-Cookie` value that discards any pending notice
pub fn clear_notice_cookie() -> HeaderValue {
    HeaderValue::from_static(CLEAR_COOKIE)
}

/// Read the pending notice from the request cookies, if any
pub fn take_notice(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == NOTICE_COOKIE)
        .and_then(|(_, value)| URL_SAFE_NO_PAD.decode(value).ok())
        .and_then(|raw| String::from_utf8(raw).ok())
        .filter(|message| !message.is_empty())
}

/// `303 See Other` to `location`, leaving `message` for the next page
pub fn redirect_with_notice(location: &'static str, message: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static(location));
    headers.insert(SET_COOKIE, notice_cookie(message));
    (StatusCode::SEE_OTHER, headers).into_response()
}
