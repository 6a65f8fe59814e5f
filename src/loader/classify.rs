//! Response classification.
//!
//! # Rules (applied in order)
//! 1. Non-JSON content type and the transport followed a redirect → `Redirected`
//! 2. 401/403 → `Denied` (message from `state.error`, then `error`)
//! 3. Any other non-2xx → `Failed` (message from `error`)
//! 4. Otherwise → `Success` with the parsed body; an unparseable body is `Failed`
//!
//! Transport-independent so the rules can be tested without a network.

use serde_json::Value;

use crate::loader::types::LoadResult;

/// Default message for a denial without an `error` field.
pub const DENIED_MESSAGE: &str = "You do not have permission to view this page";

/// The parts of an HTTP response the classifier looks at.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// The transport followed at least one redirect.
    pub redirected: bool,
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

impl FetchedResponse {
    /// Returns true if the content type is JSON (`application/json` or a `+json` type).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                essence == "application/json" || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }

    fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Classify a fetched response into a load result.
pub fn classify(response: &FetchedResponse) -> LoadResult {
    if !response.is_json() && response.redirected {
        return LoadResult::Redirected {
            target_url: response.url.clone(),
        };
    }

    let body = response.json_body();
    let status = response.status;

    if status == 401 || status == 403 {
        let message = body
            .as_ref()
            .and_then(denial_message)
            .unwrap_or_else(|| DENIED_MESSAGE.to_string());
        return LoadResult::Denied { message, status };
    }

    if !(200..300).contains(&status) {
        let message = body
            .as_ref()
            .and_then(|b| string_field(b, "error"))
            .unwrap_or_else(|| format!("Request failed (status {})", status));
        return LoadResult::Failed {
            message,
            status: Some(status),
        };
    }

    match body {
        Some(data) => LoadResult::Success { data, status },
        None => LoadResult::Failed {
            message: "Response body was not valid JSON".to_string(),
            status: Some(status),
        },
    }
}

fn denial_message(body: &Value) -> Option<String> {
    body.get("state")
        .and_then(|state| string_field(state, "error"))
        .or_else(|| string_field(body, "error"))
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}
