//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use safereg_assessor::AssessorError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AssessorError> for RpcError {
    fn from(e: AssessorError) -> Self {
        match e {
            AssessorError::InvalidAddress(_) | AssessorError::InvalidSubmission(_) => {
                RpcError::InvalidRequest(e.to_string())
            }
            AssessorError::ReportNotFound(_) => RpcError::NotFound(e.to_string()),
            AssessorError::UpstreamUnavailable(_) => RpcError::Unavailable(e.to_string()),
            AssessorError::Config(_) => RpcError::Server(e.to_string()),
        }
    }
}
