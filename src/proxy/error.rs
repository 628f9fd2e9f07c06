//! Forwarding failures and their client-facing representation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A failure that terminates a single forwarded request.
///
/// None of these are retried; each becomes a 500 JSON response.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Failed to parse URL")]
    MalformedUrl(String),

    #[error("Failed to create request")]
    RequestConstruction(String),

    #[error("Failed to send request to target server")]
    UpstreamUnreachable(String),

    #[error("Failed to read response body")]
    BodyRead(String),
}

impl ForwardError {
    /// Underlying error text.
    pub fn details(&self) -> &str {
        match self {
            ForwardError::MalformedUrl(d)
            | ForwardError::RequestConstruction(d)
            | ForwardError::UpstreamUnreachable(d)
            | ForwardError::BodyRead(d) => d,
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// JSON body returned for every forwarding failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let details = self.details();
        let body = ErrorBody {
            error: self.to_string(),
            details: (!details.is_empty()).then(|| details.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}
