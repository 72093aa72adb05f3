use http::{header::AUTHORIZATION, HeaderMap};

use crate::errors::AppError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Raw `Authorization` header value.
///
/// `Some("")` is returned for a value that is present but not valid UTF-8, so
/// callers report it as an unsupported scheme rather than a missing header.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}

/// Token carried by an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    strip_scheme(header, BEARER_PREFIX)
}

/// Key carried by an `Authorization: ApiKey <key>` header (webhook callers).
pub fn extract_api_key(header: Option<&str>) -> Result<&str, AppError> {
    strip_scheme(header, API_KEY_PREFIX)
}

fn strip_scheme<'a>(header: Option<&'a str>, prefix: &str) -> Result<&'a str, AppError> {
    header
        .ok_or(AppError::MissingAuthHeader)?
        .strip_prefix(prefix)
        .ok_or(AppError::UnsupportedScheme)
}
