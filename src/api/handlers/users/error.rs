use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::types::MessageResponse;
use crate::{auth::PasswordError, store::StoreError};

/// Failures returned by the `/users` handlers.
///
/// Every variant renders as `{ "message": ... }`. `Server` and `Internal` keep
/// the cause for the log and show the client a generic message only; they
/// differ in wording because account handlers and token handlers have always
/// answered with different strings.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    InvalidToken(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("server error: {0:#}")]
    Server(anyhow::Error),
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

pub(super) const SERVER_ERROR: &str = "Server error";
pub(super) const INTERNAL_SERVER_ERROR: &str = "Internal server error";

impl ApiError {
    /// Converts `err`, answering "Internal server error" instead of "Server error"
    /// if it turns out to be a server failure.
    pub fn internal(err: impl Into<Self>) -> Self {
        match err.into() {
            Self::Server(err) => Self::Internal(err),
            other => other,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::InvalidToken(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Server(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Validation(message)
            | Self::Conflict(message)
            | Self::InvalidToken(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message) => message,
            Self::Server(_) => SERVER_ERROR,
            Self::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Server(err) | Self::Internal(err) = &self {
            error!("{err:#}");
        }
        (self.status(), Json(MessageResponse::new(self.message()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict("User already exists"),
            StoreError::Backend(err) => Self::Server(err),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Server(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> Result<(StatusCode, serde_json::Value)> {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn taxonomy_maps_to_status_codes() -> Result<()> {
        let cases = [
            (ApiError::Validation("v"), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("c"), StatusCode::BAD_REQUEST),
            (ApiError::InvalidToken("t"), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("u"), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("n"), StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            let message = err.message();
            let (status, body) = body_of(err).await?;
            assert_eq!(status, expected);
            assert_eq!(body, serde_json::json!({ "message": message }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn server_error_hides_cause() -> Result<()> {
        let (status, body) = body_of(ApiError::Server(anyhow!("pool timed out"))).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "message": "Server error" }));
        Ok(())
    }

    #[tokio::test]
    async fn internal_upgrades_only_server_failures() -> Result<()> {
        let err = ApiError::internal(StoreError::Backend(anyhow!("connection reset")));
        let (status, body) = body_of(err).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "message": "Internal server error" }));

        let err = ApiError::internal(ApiError::NotFound("User not found."));
        assert!(matches!(err, ApiError::NotFound("User not found.")));
        Ok(())
    }

    #[test]
    fn store_conflict_becomes_conflict() {
        let err = ApiError::from(StoreError::Conflict);
        assert!(matches!(err, ApiError::Conflict("User already exists")));
    }
}
