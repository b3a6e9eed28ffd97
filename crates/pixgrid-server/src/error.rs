//! Request errors and their HTTP responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pixgrid_export::ExportError;
use pixgrid_pipeline::PipelineError;
use pixgrid_session::SessionError;
use serde_json::json;

/// Everything a handler can fail with.
///
/// Rendered as `{ "status": "error", "error": "<message>" }` with a
/// status code chosen by [`ApiError::status`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request or out-of-range parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Reading the multipart upload failed.
    #[error("failed to read upload: {0}")]
    Multipart(#[from] MultipartError),

    /// Unknown or expired session; the client must upload again.
    #[error("session not found")]
    SessionNotFound,

    /// Decoding the upload or converting it failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Encoding the result failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Creating the session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A blocking conversion task panicked or was cancelled.
    #[error("conversion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status for this error.
    ///
    /// Decode failures are the client's bad upload (400). Parameter
    /// rejections from a pipeline stage are 422. Encoding, randomness
    /// and task failures are the server's problem (500).
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::Pipeline(e) if e.stage().is_some() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Pipeline(_) => StatusCode::BAD_REQUEST,
            Self::Export(_) | Self::Session(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "request rejected");
        }
        (status, Json(json!({ "status": "error", "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pixgrid_pipeline::Stage;

    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::SessionNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(PipelineError::EmptyInput).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PipelineError::DimensionOverflow {
                stage: Stage::Upscale
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(SessionError::InvalidConfig("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message() {
        assert_eq!(ApiError::SessionNotFound.to_string(), "session not found");
    }
}
