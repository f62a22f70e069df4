//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (401 → [`ApiError::Unauthorized`],
//! non-success → [`ApiError::Server`] with the message and field errors
//! pulled out of the body) so the client stays focused on request
//! construction.

use farmdesk_core::FieldErrors;
use serde_json::Value;

use crate::error::ApiError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(error_from_body(status.as_u16(), &body));
    }
    Ok(resp)
}

/// Read a successful response body as JSON. Empty bodies become `null`.
pub async fn read_json(resp: reqwest::Response) -> Result<Value, ApiError> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::decode(format!("invalid JSON body: {e}")))
}

/// Build a server error from a status and raw response body.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = match &parsed {
        Some(value) => extract_message(value),
        None => Some(body.trim().to_string()).filter(|s| !s.is_empty()),
    }
    .unwrap_or_else(|| format!("Request failed with status {status}"));
    let field_errors = parsed.as_ref().map(extract_field_errors).unwrap_or_default();

    ApiError::Server {
        status,
        message,
        field_errors,
    }
}

/// Pull a human message out of an error body.
///
/// Looks at `message`, then `error` (string or `{ message }`), then falls
/// back to the serialized body.
fn extract_message(body: &Value) -> Option<String> {
    let obj = match body {
        Value::Object(obj) => obj,
        Value::String(s) => return Some(s.clone()).filter(|s| !s.is_empty()),
        Value::Null => return None,
        other => return Some(other.to_string()),
    };

    if let Some(Value::String(message)) = obj.get("message") {
        return Some(message.clone());
    }
    match obj.get("error") {
        Some(Value::String(error)) => return Some(error.clone()),
        Some(Value::Object(inner)) => {
            if let Some(Value::String(message)) = inner.get("message") {
                return Some(message.clone());
            }
        }
        _ => {}
    }
    if obj.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Pull per-field messages out of `errors` or `validationErrors`.
///
/// Both the map form (`{ "Email": "taken" }` or `{ "Email": ["taken"] }`)
/// and the list form (`[{ "field": "Email", "message": "taken" }]`) occur.
fn extract_field_errors(body: &Value) -> FieldErrors {
    let mut out = FieldErrors::new();
    let Some(errors) = body.get("errors").or_else(|| body.get("validationErrors")) else {
        return out;
    };

    match errors {
        Value::Object(map) => {
            for (field, value) in map {
                if let Some(message) = message_text(value) {
                    out.insert(field.clone(), message);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                if let (Some(field), Some(message)) = (field, message) {
                    out.insert(field.to_string(), message.to_string());
                }
            }
        }
        _ => {}
    }
    out
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "[]");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn check_response_unauthorized() {
        let resp = mock_response(401, r#"{"message":"jwt expired"}"#);
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn check_response_server_message() {
        let resp = mock_response(409, r#"{"message":"Username already taken"}"#);
        let err = check_response(resp).await.unwrap_err();
        match err {
            ApiError::Server {
                status, message, ..
            } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Username already taken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_response_plain_text_body() {
        let resp = mock_response(502, "Bad Gateway");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, ref message, .. } if message == "Bad Gateway"));
    }

    #[tokio::test]
    async fn check_response_empty_body() {
        let resp = mock_response(500, "");
        let err = check_response(resp).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Server { ref message, .. } if message == "Request failed with status 500")
        );
    }

    #[tokio::test]
    async fn read_json_empty_is_null() {
        let value = read_json(mock_response(204, "")).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn read_json_invalid_is_decode_error() {
        let err = read_json(mock_response(200, "<html>")).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn message_from_error_field() {
        assert_eq!(
            extract_message(&json!({"error": "Forbidden"})).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(
            extract_message(&json!({"error": {"message": "Locked"}})).as_deref(),
            Some("Locked")
        );
        assert_eq!(
            extract_message(&json!({"code": 7})).as_deref(),
            Some(r#"{"code":7}"#)
        );
        assert_eq!(extract_message(&json!({})), None);
    }

    #[test]
    fn field_errors_map_form() {
        let errors = extract_field_errors(&json!({
            "errors": {"Email": "Email already registered", "Phone": ["too short", "digits only"]}
        }));
        assert_eq!(errors["Email"], "Email already registered");
        assert_eq!(errors["Phone"], "too short; digits only");
    }

    #[test]
    fn field_errors_list_form() {
        let errors = extract_field_errors(&json!({
            "validationErrors": [
                {"field": "Username", "message": "taken"},
                {"param": "Phone", "msg": "invalid"},
                {"message": "no field"}
            ]
        }));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["Username"], "taken");
        assert_eq!(errors["Phone"], "invalid");
    }

    #[test]
    fn error_from_body_collects_everything() {
        let err = error_from_body(
            422,
            r#"{"message":"Validation failed","errors":{"Email":"bad"}}"#,
        );
        assert_eq!(err.user_message(false), "Validation failed");
        assert_eq!(err.field_errors()["Email"], "bad");
    }
}
