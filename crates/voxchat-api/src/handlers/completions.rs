use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;

use voxchat_stream::reframe;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    pub user_id: String,
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

/// Forward a question to the chat backend and stream the answer back as SSE.
///
/// Upstream failures detected before the first byte is forwarded become
/// ordinary HTTP error responses; once the stream is open, failures can only
/// be reported in-band (the reframer emits a `{"code":-1,...}` frame).
///
/// The upstream body is not reliably line- or event-delimited, so it goes
/// through [`reframe`] rather than straight passthrough. If the browser
/// disconnects, axum drops the body stream, which drops the reqwest response
/// and closes the upstream connection without another read.
pub async fn completions(
    State(state): State<AppState>,
    Json(req): Json<CompletionRequest>,
) -> ApiResult<Response> {
    let url = format!(
        "{}/completions?user_id={}",
        state.config.chat_base_url(),
        urlencoding::encode(&req.user_id)
    );

    let upstream = state
        .http
        .post(&url)
        .bearer_auth(&state.config.chat_api_key)
        .header(header::ACCEPT, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .json(&serde_json::json!({
            "user_id": req.user_id,
            "question": req.question,
            "session_id": req.session_id,
            "stream": req.stream,
        }))
        .send()
        .await?;

    let status = upstream.status();
    if !status.is_success() {
        let status = StatusCode::from_u16(status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = upstream.json().await.unwrap_or_default();
        return Err(ApiError::UpstreamStatus {
            status,
            code: body.get("code").and_then(|c| c.as_i64()).unwrap_or(-1),
            message: body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Server error")
                .to_string(),
        });
    }

    let frames = reframe(upstream.bytes_stream())
        .map(|frame| Ok::<Bytes, Infallible>(Bytes::from(frame)));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(frames))
        .map_err(|e| ApiError::Config(e.to_string()))?;

    Ok(response)
}
