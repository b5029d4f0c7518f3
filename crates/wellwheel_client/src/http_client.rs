//! Response handling shared by the reqwest-based clients.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::ClientError;

/// Build the underlying reqwest client with a per-request timeout.
pub fn build_http(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Pull a human-readable message out of an upstream error body. Handles the
/// Google and OpenAI `{"error": {"message"}}` shape as well as PostgREST and
/// GoTrue bodies.
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    let candidates = [
        body.pointer("/error/message"),
        body.get("error_description"),
        body.get("message"),
        body.get("msg"),
        body.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Convert a failed response into a `ClientError`, counting it per service.
pub async fn error_from_response(
    service: &'static str,
    resp: reqwest::Response,
    fallback: &str,
) -> ClientError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| fallback.to_string());
    metrics::counter!("wellwheel_upstream_errors_total", "service" => service).increment(1);
    tracing::warn!(service, status, %message, "upstream request failed");

    match status {
        401 | 403 if service != "youtube" => ClientError::Auth(message),
        _ => ClientError::Upstream { status, message },
    }
}

/// Send a request and decode a JSON body, reading text first so decode
/// failures can quote what came back.
pub async fn execute_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
    fallback: &str,
) -> Result<T, ClientError> {
    let resp = request.send().await?;
    if !resp.status().is_success() {
        return Err(error_from_response(service, resp, fallback).await);
    }
    let text = resp.text().await?;
    serde_json::from_str::<T>(&text).map_err(|e| {
        let body_snippet: String = text.chars().take(256).collect();
        ClientError::Decode(format!("{service}: {e} - body: {body_snippet}"))
    })
}

/// Send a request whose response body is irrelevant.
pub async fn execute_empty(
    service: &'static str,
    request: reqwest::RequestBuilder,
    fallback: &str,
) -> Result<(), ClientError> {
    let resp = request.send().await?;
    if !resp.status().is_success() {
        return Err(error_from_response(service, resp, fallback).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_nested_google_message() {
        let body = json!({"error": {"code": 403, "message": "quotaExceeded"}});
        assert_eq!(error_message(&body).as_deref(), Some("quotaExceeded"));
    }

    #[test]
    fn finds_flat_messages() {
        assert_eq!(error_message(&json!({"message": "row denied"})).as_deref(), Some("row denied"));
        assert_eq!(error_message(&json!({"msg": "bad jwt"})).as_deref(), Some("bad jwt"));
        assert_eq!(error_message(&json!({"error": "nope"})).as_deref(), Some("nope"));
    }

    #[test]
    fn ignores_blank_or_missing_messages() {
        assert_eq!(error_message(&json!({"message": "  "})), None);
        assert_eq!(error_message(&json!({"code": 1})), None);
    }
}
