//! Parsing of provider token responses.

use chrono::Utc;
use serde_json::{Map, Value};

use super::Token;
use crate::error::{protocol_error, token_error, Error, ProtocolErrorKind, TokenErrorKind};
use crate::oauth::scope::split_scope;

/// Parse a token endpoint response body.
///
/// Vendor error payloads are detected before anything else and fail with a protocol error.
///
/// # Arguments
///
/// * `content` - Raw response body, expected to be a JSON object
/// * `delimiter` - The provider's scope delimiter, used when `scope` is a string
pub fn parse_token(content: &str, delimiter: &str) -> Result<Token, Error> {
    parse_token_at(content, delimiter, Utc::now().timestamp())
}

pub(crate) fn parse_token_at(content: &str, delimiter: &str, now: i64) -> Result<Token, Error> {
    let value: Value = serde_json::from_str(content)?;
    let object = value
        .as_object()
        .ok_or_else(|| token_error(TokenErrorKind::InvalidFormat, "invalid response format"))?;

    check_response_error(object)?;

    let access_token = object
        .get("access_token")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let refresh_token = object
        .get("refresh_token")
        .and_then(Value::as_str)
        .map(str::to_string);

    let scope = match object.get("scope") {
        Some(Value::String(scope)) => split_scope(scope, delimiter),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Token::new(
        access_token,
        refresh_token,
        expires_from(object.get("expires_in"), now),
        scope,
    )
}

/// Fail with the best available message when the body carries a vendor error.
///
/// `error` is reported through `error_description`, else `error_reason`, else its own value.
/// A bare `error_message` fails too.
fn check_response_error(object: &Map<String, Value>) -> Result<(), Error> {
    let message = if let Some(error) = object.get("error").filter(|v| is_present(v)) {
        object
            .get("error_description")
            .filter(|v| is_present(v))
            .or_else(|| object.get("error_reason").filter(|v| is_present(v)))
            .map(message_of)
            .unwrap_or_else(|| message_of(error))
    } else if let Some(error_message) = object.get("error_message").filter(|v| is_present(v)) {
        message_of(error_message)
    } else {
        return Ok(());
    };

    Err(protocol_error(
        ProtocolErrorKind::Unauthorized,
        &format!("Unauthorized: {}", message),
    ))
}

fn expires_from(expires_in: Option<&Value>, now: i64) -> i64 {
    let seconds = match expires_in {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or_default()
        }
        _ => 0,
    };

    if seconds == 0 {
        0
    } else {
        now.saturating_add(seconds)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

// Facebook nests its errors: {"error": {"message": "...", "type": "OAuthException"}}
fn message_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
