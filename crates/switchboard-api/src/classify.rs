// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps platform responses to human-readable failure messages.

use serde_json::Value;

/// Builds the caller-facing message for a non-success HTTP status.
///
/// Known statuses get specific guidance; anything else gets a generic
/// template. When the body carries a platform message it is appended.
pub fn describe_status(status: u16, body: &str) -> String {
    let guidance = match status {
        400 => "The platform rejected the request parameters.".to_string(),
        401 => "Invalid credentials: check the API key, account id and phone id.".to_string(),
        403 => "Permission denied: this account may not perform the requested action."
            .to_string(),
        404 => "Not found: the contact, chat or action does not exist.".to_string(),
        408 => "The platform timed out while handling the request.".to_string(),
        429 => "Rate limited: too many requests, wait before trying again.".to_string(),
        500..=599 => {
            format!("Platform server error ({status}); the service may be under maintenance.")
        }
        _ => format!("Unexpected response from the platform (HTTP {status})."),
    };

    match platform_message(body) {
        Some(detail) => format!("{guidance} Platform said: {detail}"),
        None => guidance,
    }
}

/// Returns the platform's own failure message when `payload` reports
/// `success: false`, or `None` for a successful payload.
///
/// Only an explicit falsy flag counts; a payload without a `success`
/// field is treated as success.
pub fn business_failure(payload: &Value) -> Option<String> {
    let failed = match payload.get("success")? {
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_i64() == Some(0),
        Value::String(s) => matches!(s.trim(), "false" | "0"),
        _ => false,
    };

    failed.then(|| {
        extract_message(payload).unwrap_or_else(|| "the platform reported a failure".to_string())
    })
}

fn platform_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    extract_message(&value)
}

fn extract_message(value: &Value) -> Option<String> {
    let candidates = [
        value.get("message"),
        value.get("error").filter(|e| e.is_string()),
        value.get("error").and_then(|e| e.get("message")),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
