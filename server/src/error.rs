//! Request-level errors and their JSON responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use waveguide_field::FieldError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing, malformed or out-of-domain input. Never retried.
    #[error("invalid parameters: {0}")]
    InvalidParameter(String),

    /// Unexpected failure inside field evaluation
    #[error("computation failed: {0}")]
    Compute(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl From<FieldError> for ServiceError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::InvalidParameter(msg) => ServiceError::InvalidParameter(msg),
            FieldError::Compute(msg) => ServiceError::Compute(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ServiceError::Compute(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ServiceError::InvalidParameter(msg) => ErrorBody {
                error: "invalid parameters",
                message: Some(msg.clone()),
            },
            ServiceError::Compute(msg) => ErrorBody {
                error: "computation failed",
                message: Some(msg.clone()),
            },
            ServiceError::MethodNotAllowed => ErrorBody {
                error: "only POST requests are supported",
                message: None,
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_map_to_status() {
        let err: ServiceError = FieldError::InvalidParameter("gridSize".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ServiceError = FieldError::Compute("overflow".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message.as_deref(), Some("overflow"));
    }

    #[test]
    fn test_method_not_allowed_body() {
        let body = serde_json::to_value(ServiceError::MethodNotAllowed.body()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "only POST requests are supported" }));
    }
}
