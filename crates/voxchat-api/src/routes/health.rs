use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports which upstream providers this gateway has credentials for. No
/// liveness probes against the providers themselves; this is a config check.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let chat = if state.config.chat.endpoint.is_empty() || state.config.chat_api_key.is_empty() {
        "unconfigured"
    } else {
        "configured"
    };
    services.insert("chat_backend".to_string(), chat.to_string());

    let tts = if state.config.tts.is_configured() && !state.config.tts_api_secret.is_empty() {
        "configured"
    } else {
        "unconfigured"
    };
    services.insert("tts".to_string(), tts.to_string());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
