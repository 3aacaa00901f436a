use axum::http::StatusCode;
use axum::response::IntoResponse;

use voxchat_api::error::ApiError;
use voxchat_stream::Envelope;

#[tokio::test]
async fn test_bad_request_maps_to_400_envelope() {
    let error = ApiError::BadRequest("missing user_id".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let envelope: Envelope = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(envelope.code, -1);
    assert!(envelope.message.contains("missing user_id"));
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn test_upstream_status_preserved() {
    let error = ApiError::UpstreamStatus {
        status: StatusCode::NOT_FOUND,
        code: 102,
        message: "Session not found".to_string(),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let envelope: Envelope = serde_json::from_slice(&bytes).unwrap();

    // The backend's own protocol code passes through untouched.
    assert_eq!(envelope.code, 102);
    assert_eq!(envelope.message, "Session not found");
}

#[tokio::test]
async fn test_tts_unconfigured_is_503() {
    let response = ApiError::TtsNotConfigured.into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_error_body_serializes_null_data() {
    let json = serde_json::to_string(&Envelope::error("Server error")).unwrap();
    assert_eq!(json, r#"{"code":-1,"message":"Server error","data":null}"#);
}
