use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use voxchat_stream::Envelope;

/// Errors surfaced before any response byte has been streamed. Anything that
/// happens after headers are sent is encoded in-band as an SSE error frame
/// instead (see the completions handler).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    UpstreamStatus {
        status: StatusCode,
        code: i64,
        message: String,
    },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("TTS provider is not configured")]
    TtsNotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::UpstreamStatus {
                status,
                code,
                message,
            } => (status, code, message),
            ApiError::Upstream(ref e) => {
                tracing::error!("upstream request failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    -1,
                    "Upstream request failed".to_string(),
                )
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, -1, self.to_string()),
            ApiError::TtsNotConfigured => (StatusCode::SERVICE_UNAVAILABLE, -1, self.to_string()),
            ApiError::Config(ref msg) => {
                tracing::error!("config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    -1,
                    "Configuration error".to_string(),
                )
            }
        };

        let mut envelope = Envelope::error(message);
        envelope.code = code;
        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
