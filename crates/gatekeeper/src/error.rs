//! Error handling and API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lilt::gate::GateError;
use serde::Serialize;
use thiserror::Error;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Application error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rule denied")]
    PolicyDenied,

    #[error("Policy check unavailable: {0}")]
    PolicyUnavailable(String),

    #[error("Policy defect: {0}")]
    PolicyDefect(String),

    #[error("Bad request")]
    BadRequest,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PolicyDenied => StatusCode::FORBIDDEN,
            ApiError::PolicyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PolicyDefect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::PolicyDenied => "POLICY_DENIED",
            ApiError::PolicyUnavailable(_) => "POLICY_UNAVAILABLE",
            ApiError::PolicyDefect(_) => "POLICY_DEFECT",
            ApiError::BadRequest => "BAD_REQUEST",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::PolicyDenied { .. } => ApiError::PolicyDenied,
            err if err.is_transient() => ApiError::PolicyUnavailable(err.to_string()),
            err => ApiError::PolicyDefect(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // The gate already logged policy failures with their error codes
        let message = match &self {
            ApiError::PolicyUnavailable(_) => "Policy check is temporarily unavailable".to_string(),
            ApiError::PolicyDefect(_) => "Policy check failed".to_string(),
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lilt::error::{LiltError, StoreError};
    use std::time::Duration;

    #[test]
    fn test_gate_error_mapping() {
        let err = ApiError::from(GateError::PolicyDenied {
            action: "create-post".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Rule denied");

        let err = ApiError::from(GateError::Evaluation(LiltError::Timeout(Duration::from_secs(2))));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(GateError::Evaluation(LiltError::Predicate {
            name: "profiles-count".to_string(),
            source: StoreError::Unavailable("down".to_string()).into(),
        }));
        assert_eq!(err.error_code(), "POLICY_UNAVAILABLE");

        let err = ApiError::from(GateError::Evaluation(LiltError::UnknownSymbol("foo".to_string())));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "POLICY_DEFECT");

        let err = ApiError::from(GateError::UnknownAction("delete-post".to_string()));
        assert_eq!(err.error_code(), "POLICY_DEFECT");
    }
}
