use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fedhub_core::HandledResponseModel;

use crate::error::ServiceError;

/// Error returned by the HTTP handlers. Every variant renders as a
/// `HandledResponseModel` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Service(ServiceError::NotFound { .. }) => "not_found",
            Self::Service(ServiceError::Validation(_)) => "validation_error",
            Self::Service(ServiceError::Conflict(_)) => "conflict",
            Self::Service(ServiceError::Storage(_)) => "internal_error",
            Self::BadRequest(_) => "bad_request",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Host attach routes answer an unknown host or remote with 400.
    pub fn missing_as_bad_request(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => Self::BadRequest(err.to_string()),
            other => Self::Service(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // storage details stay in the logs
        let message = match &self {
            Self::Service(ServiceError::Storage(err)) => {
                tracing::error!("request failed: {err:?}");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        let body = HandledResponseModel {
            message,
            code: self.code().to_owned(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found: ApiError = ServiceError::not_found("host", 3).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "host 3 not found");

        let conflict: ApiError = ServiceError::Conflict("already attached".to_owned()).into();
        assert_eq!(conflict.status_code(), StatusCode::BAD_REQUEST);

        let storage: ApiError = ServiceError::Storage(anyhow::anyhow!("connection reset")).into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.code(), "internal_error");
    }
}
