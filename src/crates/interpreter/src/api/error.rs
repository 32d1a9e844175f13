//! API error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::InterpreterError;

/// Error body: `{success:false, error, code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request data
    #[error("{0}")]
    BadRequest(String),

    /// Interpretation failed for the whole request
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Interpreter(
                InterpreterError::InvalidInstruction(_) | InterpreterError::InvalidPlan(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Interpreter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Interpreter(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse::new(self.to_string(), self.code());

        if status.is_server_error() {
            tracing::error!(code = %body.code, error = %body.error, "Request failed");
        } else {
            tracing::debug!(code = %body.code, error = %body.error, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
