//! HTTP plumbing shared by every provider

use crate::error::{AnalysisError, AnalysisOutcome, TransportFailure};
use crate::logging::{log_debug, log_error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Build the HTTP client, applying the transport-level timeout if configured
pub(crate) fn build_client(timeout: Option<Duration>) -> AnalysisOutcome<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        AnalysisError::configuration_error(format!("Failed to build HTTP client: {e}"))
    })
}

/// JSON content type plus `Authorization: Bearer <token>`
pub(crate) fn bearer_headers(provider: &str, token: &str) -> AnalysisOutcome<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            AnalysisError::configuration_error(format!("Invalid {provider} API key format: {e}"))
        })?,
    );
    Ok(headers)
}

/// Selected-model cell shared by the provider implementations
#[derive(Debug)]
pub(crate) struct ModelSelection(RwLock<String>);

impl ModelSelection {
    pub(crate) fn new(model: impl Into<String>) -> Self {
        Self(RwLock::new(model.into()))
    }

    pub(crate) fn get(&self) -> String {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn set(&self, model: &str) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = model.to_string();
    }
}

/// POST `body` as JSON and return the success body text
///
/// Non-success statuses are classified into [`TransportFailure`]s. Nothing
/// is retried.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    provider: &str,
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &T,
) -> AnalysisOutcome<String> {
    let start_time = Instant::now();

    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            log_error!(
                provider = %provider,
                url = %url,
                error = %e,
                "HTTP request failed"
            );
            AnalysisError::transport_error(
                provider,
                TransportFailure::Network,
                format!("Request failed: {e}"),
                Some(Box::new(e)),
            )
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(handle_error_response(provider, response).await);
    }

    let raw_body = response.text().await.map_err(|e| {
        AnalysisError::transport_error(
            provider,
            TransportFailure::Network,
            format!("Failed to read response body: {e}"),
            Some(Box::new(e)),
        )
    })?;

    log_debug!(
        provider = %provider,
        status = %status,
        duration_ms = start_time.elapsed().as_millis() as u64,
        body_length = raw_body.len(),
        "Received provider response"
    );

    Ok(raw_body)
}

/// Classify a non-success HTTP response
async fn handle_error_response(provider: &str, response: reqwest::Response) -> AnalysisError {
    let status = response.status();
    let retry_after_seconds = response
        .headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(60);
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    log_error!(
        provider = %provider,
        status = %status,
        error_text = %error_text,
        "API error response"
    );

    let detail = error_detail(&error_text);
    let reason = match status.as_u16() {
        401 | 403 => TransportFailure::Authentication,
        429 => TransportFailure::RateLimited {
            retry_after_seconds,
        },
        code => TransportFailure::Status(code),
    };

    AnalysisError::transport_error(provider, reason, format!("API error {status}: {detail}"), None)
}

/// Human-readable message from an error body
///
/// Understands `{"error": "..."}` and `{"error": {"message": "..."}}`,
/// falling back to the raw text.
pub(crate) fn error_detail(error_text: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(error_text) else {
        return error_text.to_string();
    };
    match json.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(obj) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| obj.to_string()),
        None => error_text.to_string(),
    }
}
