//! `webhook` action.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde_json::{json, Value};
use std::time::Duration;

use crate::action::WebhookAction;
use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::sanitize::sanitize_headers;

/// Default request timeout for webhook calls.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used for `webhook` actions.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    pub(crate) async fn execute(
        &self,
        action: &WebhookAction,
        ctx: &WorkflowContext,
    ) -> Result<Value, ActionError> {
        let url = ctx.interpolate(&action.url);
        let url = Url::parse(&url).map_err(|e| {
            ActionError::InvalidDefinition(format!("invalid webhook url '{}': {}", url, e))
        })?;

        let headers: Vec<(String, String)> = action
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), ctx.interpolate(value)))
            .collect();

        let method: Method = action.method.into();
        let mut request = self.client.request(method.clone(), url.clone());

        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &action.body {
            request = match ctx.interpolate_value(body) {
                Value::String(raw) => {
                    let has_content_type = headers
                        .iter()
                        .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                    if has_content_type {
                        request.body(raw)
                    } else {
                        request.header(CONTENT_TYPE, "application/json").body(raw)
                    }
                }
                other => request.json(&other),
            };
        }

        tracing::debug!(
            url = %url,
            method = %method,
            headers = ?sanitize_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            execution_id = %ctx.execution_id,
            "Calling webhook"
        );

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ActionError::HttpStatus(status.as_u16()));
        }

        Ok(json!({"statusCode": status.as_u16()}))
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK_TIMEOUT)
    }
}
