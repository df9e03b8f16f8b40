//! Request and response envelopes of the AnkiConnect protocol.
//!
//! Requests look like `{"action": "...", "version": N, "params": {...}}`;
//! responses always carry exactly two keys, `{"result": ..., "error": ...}`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{AnkiError, Result};

/// One action sent to AnkiConnect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    pub action: String,
    pub version: u32,
    pub params: Map<String, Value>,
}

impl ActionRequest {
    /// Builds a request, rejecting an empty action name.
    ///
    /// # Errors
    ///
    /// Returns [`AnkiError::Validation`] if `action` is empty or only whitespace.
    pub fn new(action: &str, version: u32, params: Map<String, Value>) -> Result<Self> {
        if action.trim().is_empty() {
            return Err(AnkiError::Validation(
                "action name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            action: action.to_string(),
            version,
            params,
        })
    }
}

/// A validated response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResponse {
    pub result: Value,
    /// `None` when the remote sent `"error": null`.
    pub error: Option<String>,
}

impl ActionResponse {
    /// Parses a raw response body and checks the envelope shape.
    ///
    /// # Errors
    ///
    /// Returns [`AnkiError::MalformedResponse`] if the body is not JSON, is not
    /// an object, or does not consist of exactly the keys `result` and `error`.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AnkiError::MalformedResponse(format!("body is not valid JSON: {e}")))?;

        let Value::Object(mut envelope) = value else {
            return Err(AnkiError::MalformedResponse(
                "expected a JSON object with `result` and `error`".to_string(),
            ));
        };

        for key in ["result", "error"] {
            if !envelope.contains_key(key) {
                return Err(AnkiError::MalformedResponse(format!("missing key `{key}`")));
            }
        }
        if envelope.len() != 2 {
            let extra: Vec<&str> = envelope
                .keys()
                .map(String::as_str)
                .filter(|k| *k != "result" && *k != "error")
                .collect();
            return Err(AnkiError::MalformedResponse(format!(
                "unexpected keys in envelope: {}",
                extra.join(", ")
            )));
        }

        let result = envelope.remove("result").unwrap_or(Value::Null);
        let error = match envelope.remove("error").unwrap_or(Value::Null) {
            Value::Null => None,
            Value::String(msg) => Some(msg),
            other => Some(other.to_string()),
        };

        Ok(Self { result, error })
    }

    /// Returns the result, or the remote error if one was reported.
    ///
    /// # Errors
    ///
    /// Returns [`AnkiError::RemoteAction`] whenever `error` is set, regardless
    /// of what `result` holds.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(msg) => Err(AnkiError::RemoteAction(msg)),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let mut params = Map::new();
        params.insert("query".to_string(), json!("tag:marked"));
        let req = ActionRequest::new("findNotes", 2, params).unwrap();

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"action": "findNotes", "version": 2, "params": {"query": "tag:marked"}})
        );
    }

    #[test]
    fn test_empty_params_serialize_as_object() {
        let req = ActionRequest::new("deckNames", 2, Map::new()).unwrap();
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"params\":{}"));
    }

    #[test]
    fn test_empty_action_rejected() {
        let err = ActionRequest::new("  ", 2, Map::new()).unwrap_err();
        assert!(matches!(err, AnkiError::Validation(_)));
    }

    #[test]
    fn test_parse_success() {
        let resp = ActionResponse::parse(r#"{"result": ["Default"], "error": null}"#).unwrap();
        assert_eq!(resp.error, None);
        assert_eq!(resp.into_result().unwrap(), json!(["Default"]));
    }

    #[test]
    fn test_parse_null_result_is_allowed() {
        let resp = ActionResponse::parse(r#"{"result": null, "error": null}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_error_wins_over_result() {
        let resp =
            ActionResponse::parse(r#"{"result": [1, 2], "error": "collection is not available"}"#)
                .unwrap();
        match resp.into_result() {
            Err(AnkiError::RemoteAction(msg)) => assert_eq!(msg, "collection is not available"),
            other => panic!("expected RemoteAction, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_error_is_rendered() {
        let resp = ActionResponse::parse(r#"{"result": null, "error": {"code": 3}}"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some(r#"{"code":3}"#));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = ActionResponse::parse("<html>not json</html>").unwrap_err();
        assert!(matches!(err, AnkiError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = ActionResponse::parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AnkiError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_error_key_is_malformed() {
        // Older protocol versions answer with a bare result and no envelope.
        let err = ActionResponse::parse(r#"{"result": 6}"#).unwrap_err();
        match err {
            AnkiError::MalformedResponse(msg) => assert!(msg.contains("error")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_key_is_malformed() {
        let err = ActionResponse::parse(r#"{"result": 1, "error": null, "extra": true}"#)
            .unwrap_err();
        match err {
            AnkiError::MalformedResponse(msg) => assert!(msg.contains("extra")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }
}
