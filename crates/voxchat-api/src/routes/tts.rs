use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

type HmacSha256 = Hmac<Sha256>;

/// Connection parameters the browser needs to open the provider WebSocket.
/// Field names follow the provider's JS SDK conventions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsConnection {
    pub ws_url: String,
    pub app_id: String,
    pub res_id: String,
}

/// Hand the browser a freshly signed WebSocket URL for the TTS provider.
///
/// The signature covers host, date and request line, HMAC-SHA256 over the
/// API secret. Signing happens server-side so the secret never reaches the
/// client; the URL is short-lived because the provider checks the `date`
/// parameter for clock skew.
pub async fn tts_config(State(state): State<AppState>) -> ApiResult<Json<TtsConnection>> {
    let tts = &state.config.tts;
    if !tts.is_configured() || state.config.tts_api_secret.is_empty() {
        return Err(ApiError::TtsNotConfigured);
    }

    let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let ws_url = signed_ws_url(
        &tts.host,
        &tts.path,
        &date,
        &state.config.tts_api_key,
        &state.config.tts_api_secret,
    )?;

    Ok(Json(TtsConnection {
        ws_url,
        app_id: tts.app_id.clone(),
        res_id: tts.res_id.clone(),
    }))
}

/// Canonical string the provider expects the signature to cover.
pub fn canonical_request(host: &str, path: &str, date: &str) -> String {
    format!("host: {}\ndate: {}\nGET {} HTTP/1.1", host, date, path)
}

/// Build the signed `wss://` URL for one connection attempt.
pub fn signed_ws_url(
    host: &str,
    path: &str,
    date: &str,
    api_key: &str,
    api_secret: &str,
) -> ApiResult<String> {
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| ApiError::Config(format!("invalid TTS secret: {}", e)))?;
    mac.update(canonical_request(host, path, date).as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let auth_origin = format!(
        r#"api_key="{}", algorithm="hmac-sha256", headers="host date request-line", signature="{}""#,
        api_key, signature
    );
    let authorization = STANDARD.encode(auth_origin);

    Ok(format!(
        "wss://{}{}?authorization={}&date={}&host={}",
        host,
        path,
        urlencoding::encode(&authorization),
        urlencoding::encode(date),
        urlencoding::encode(host)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_request_layout() {
        let canonical = canonical_request(
            "tts.example.com",
            "/v1/private/voice_clone",
            "Mon, 01 Jan 2024 00:00:00 GMT",
        );
        assert_eq!(
            canonical,
            "host: tts.example.com\ndate: Mon, 01 Jan 2024 00:00:00 GMT\nGET /v1/private/voice_clone HTTP/1.1"
        );
    }

    #[test]
    fn test_signed_url_composition() {
        let url = signed_ws_url(
            "tts.example.com",
            "/v1/private/voice_clone",
            "Mon, 01 Jan 2024 00:00:00 GMT",
            "key",
            "secret",
        )
        .unwrap();

        assert!(url.starts_with("wss://tts.example.com/v1/private/voice_clone?authorization="));
        assert!(url.contains("&date=Mon%2C%2001%20Jan%202024%2000%3A00%3A00%20GMT"));
        assert!(url.contains("&host=tts.example.com"));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let args = (
            "tts.example.com",
            "/v1/private/voice_clone",
            "Mon, 01 Jan 2024 00:00:00 GMT",
            "key",
            "secret",
        );
        let a = signed_ws_url(args.0, args.1, args.2, args.3, args.4).unwrap();
        let b = signed_ws_url(args.0, args.1, args.2, args.3, args.4).unwrap();
        assert_eq!(a, b);
    }
}
