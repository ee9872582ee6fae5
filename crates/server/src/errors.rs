use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::debug;

use crate::metrics::REQUEST_ERRORS_TOTAL;

/// Request-level failure, rendered as a plain-text body with its status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::Decode(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Short label used for logs and the error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Service(ServiceError::Decode(_)) => "decode",
            ApiError::Service(ServiceError::InvalidArgument(_)) => "invalid_argument",
            ApiError::Service(ServiceError::NotFound(_)) => "not_found",
            ApiError::MethodNotAllowed => "method_not_allowed",
        }
    }

    /// Text sent to the client; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Service(ServiceError::Decode(_)) => "Invalid request payload",
            ApiError::Service(ServiceError::InvalidArgument(_)) => "Invalid ID",
            ApiError::Service(ServiceError::NotFound(_)) => "Item not found",
            ApiError::MethodNotAllowed => "Method not allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        REQUEST_ERRORS_TOTAL.with_label_values(&[kind]).inc();
        debug!(kind, error = %self, "request rejected");
        (self.status(), format!("{}\n", self.public_message())).into_response()
    }
}
