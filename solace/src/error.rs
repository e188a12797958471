use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolaceError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for SolaceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SolaceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SolaceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SolaceError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SolaceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            SolaceError::GenerationUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            internal @ (SolaceError::Database(_)
            | SolaceError::Json(_)
            | SolaceError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SolaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = SolaceError::NotFound("no chat".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_range_maps_to_400() {
        let response = SolaceError::InvalidRange("start after end".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let response = SolaceError::Internal("sentiment write failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = SolaceError::Unauthorized("inactive user".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
