use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use voxchat_stream::Envelope;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSessionsRequest {
    pub ids: Vec<String>,
}

/// List sessions for a user.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<Envelope>> {
    let url = format!(
        "{}/sessions?page=1&page_size={}&user_id={}",
        state.config.chat_base_url(),
        state.config.chat.session_page_size,
        urlencoding::encode(query.user_id.as_deref().unwrap_or_default())
    );

    let request = state
        .http
        .get(&url)
        .bearer_auth(&state.config.chat_api_key);
    forward(request).await
}

/// Create a session. `user_id` falls back to the query string when the body
/// omits it.
pub async fn create_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(mut body): Json<Value>,
) -> ApiResult<Json<Envelope>> {
    if body.get("user_id").and_then(|v| v.as_str()).is_none() {
        if let (Some(obj), Some(user_id)) = (body.as_object_mut(), query.user_id.as_deref()) {
            obj.insert("user_id".to_string(), json!(user_id));
        }
    }

    let url = format!("{}/sessions", state.config.chat_base_url());
    let request = state
        .http
        .post(&url)
        .bearer_auth(&state.config.chat_api_key)
        .json(&body);
    forward(request).await
}

/// Rename a session. The browser sends PUT; the backend only speaks PATCH on
/// the session resource, so the method is mapped here.
pub async fn rename_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(req): Json<RenameSessionRequest>,
) -> ApiResult<Json<Envelope>> {
    let user_id = req
        .user_id
        .as_deref()
        .or(query.user_id.as_deref())
        .unwrap_or_default();
    let url = format!(
        "{}/sessions/{}?user_id={}",
        state.config.chat_base_url(),
        urlencoding::encode(&req.id),
        urlencoding::encode(user_id)
    );

    let request = state
        .http
        .patch(&url)
        .bearer_auth(&state.config.chat_api_key)
        .json(&json!({ "name": req.name }));
    forward(request).await
}

/// Delete sessions by id.
pub async fn delete_sessions(
    State(state): State<AppState>,
    Json(req): Json<DeleteSessionsRequest>,
) -> ApiResult<Json<Envelope>> {
    let url = format!("{}/sessions", state.config.chat_base_url());
    let request = state
        .http
        .delete(&url)
        .bearer_auth(&state.config.chat_api_key)
        .json(&json!({ "ids": req.ids }));
    forward(request).await
}

/// Send one upstream request and normalize the reply to the protocol
/// envelope: failures keep the upstream status with `code` defaulted to -1,
/// successes default to `code: 0` with `data` present.
async fn forward(request: reqwest::RequestBuilder) -> ApiResult<Json<Envelope>> {
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or_default();

    if !status.is_success() {
        tracing::error!(status = %status, "chat backend returned an error");
        return Err(ApiError::UpstreamStatus {
            status: StatusCode::from_u16(status.as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: body.get("code").and_then(|c| c.as_i64()).unwrap_or(-1),
            message: body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Server error")
                .to_string(),
        });
    }

    Ok(Json(Envelope {
        code: body.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
        message: body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Success")
            .to_string(),
        data: Some(body.get("data").cloned().unwrap_or(json!([]))),
    }))
}
