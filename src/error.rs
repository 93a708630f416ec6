//! Typed errors surfaced to API callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors reported to the caller of a single request. None of these are
/// fatal to the process; each is scoped to the request being served.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: bad mood level, empty or over-length text.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown mood or journal entry identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// Opaque failure from the music provider, surfaced unchanged.
    #[error("music provider error: {0}")]
    Provider(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_expected_status_codes() {
        let cases = [
            (
                ApiError::Validation("bad mood".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotFound("mood 42".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Provider(anyhow::anyhow!("spotify is down")),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
