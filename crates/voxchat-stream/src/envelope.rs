use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol envelope shared by HTTP error bodies and in-band error frames.
///
/// `code: 0` signals success, non-zero signals failure. Downstream parsers
/// branch on `code` to tell a clean end-of-stream from an error-terminated
/// one, so `data` is always serialized (as `null` when absent), never
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            code: 0,
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: -1,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_serializes_null_data() {
        let json = serde_json::to_string(&Envelope::error("boom")).unwrap();
        assert_eq!(json, r#"{"code":-1,"message":"boom","data":null}"#);
    }

    #[test]
    fn test_ok_envelope_round_trip() {
        let envelope = Envelope::ok(serde_json::json!({"answer": "Hi"}));
        let json = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();

        assert_eq!(back.code, 0);
        assert_eq!(back.data.unwrap()["answer"], "Hi");
    }
}
