//! Turn Reddit's error envelopes into errors.
//!
//! Reddit reports failures in several shapes depending on the endpoint family;
//! a 200 status alone does not mean the request did anything.

use crate::client::{RedditClientError, Result};
use serde_json::Value;

/// Fail when `value` carries an API error, pass everything else through.
pub fn check(value: &Value) -> Result<()> {
    if let Some(errors) = value["json"]["errors"].as_array() {
        if !errors.is_empty() {
            return Err(RedditClientError::ApiError(describe_errors(errors)));
        }
    }

    if let Some(code) = value.get("error").filter(|code| !code.is_null()) {
        let message = value["message"].as_str().unwrap_or("request failed");
        return Err(RedditClientError::ApiError(format!(
            "{} ({})",
            message,
            display_scalar(code)
        )));
    }

    // Widget endpoints answer with a reason code and a human explanation
    if let Some(reason) = value["reason"].as_str() {
        let explanation = value["explanation"].as_str().unwrap_or("");
        let fields = value["fields"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .map(display_scalar)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let mut message = format!("{}: {}", reason, explanation);
        if !fields.is_empty() {
            message.push_str(&format!(" (fields: {})", fields));
        }
        return Err(RedditClientError::ApiError(message));
    }

    if value["success"].as_bool() == Some(false) {
        return Err(RedditClientError::ApiError(
            "Reddit reported the request as unsuccessful".to_string(),
        ));
    }

    Ok(())
}

/// Render `[[code, message, field], ...]` as `CODE: message (field); ...`.
fn describe_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|error| match error.as_array() {
            Some(parts) => {
                let code = parts.first().map(display_scalar).unwrap_or_default();
                let message = parts.get(1).map(display_scalar).unwrap_or_default();
                match parts.get(2).map(display_scalar) {
                    Some(field) if !field.is_empty() => {
                        format!("{}: {} ({})", code, message, field)
                    }
                    _ => format!("{}: {}", code, message),
                }
            }
            None => display_scalar(error),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: Value) -> String {
        match check(&value) {
            Err(RedditClientError::ApiError(message)) => message,
            other => panic!("expected an API error, got {:?}", other),
        }
    }

    #[test]
    fn plain_results_pass() {
        assert!(check(&json!({"json": {"errors": []}})).is_ok());
        assert!(check(&json!([{"ok": true, "status": "added"}])).is_ok());
        assert!(check(&json!({"id": "abc", "text": "flair"})).is_ok());
        assert!(check(&Value::Null).is_ok());
        assert!(check(&json!({"error": null, "data": 1})).is_ok());
    }

    #[test]
    fn json_errors_are_listed() {
        let msg = message(json!({"json": {"errors": [
            ["BAD_CSS_NAME", "invalid css name", "css_class"],
            ["TOO_LONG", "this is too long", null]
        ]}}));
        assert_eq!(
            msg,
            "BAD_CSS_NAME: invalid css name (css_class); TOO_LONG: this is too long"
        );
    }

    #[test]
    fn numeric_error_codes_keep_the_message() {
        assert_eq!(
            message(json!({"message": "Forbidden", "error": 403})),
            "Forbidden (403)"
        );
    }

    #[test]
    fn widget_reasons_include_fields() {
        let msg = message(json!({
            "fields": ["shortName"],
            "explanation": "this field is required",
            "message": "Bad Request",
            "reason": "JSON_MISSING_KEY"
        }));
        assert_eq!(
            msg,
            "JSON_MISSING_KEY: this field is required (fields: shortName)"
        );
    }

    #[test]
    fn unsuccessful_flag_fails() {
        assert!(check(&json!({"success": false})).is_err());
        assert!(check(&json!({"success": true})).is_ok());
    }
}
