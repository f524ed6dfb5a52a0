// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the platform's RPC-style endpoint.
//!
//! Provides [`PlatformClient`] which attaches the account identity to every
//! call, form-encodes action parameters, retries transient failures with
//! exponential backoff, and classifies everything else into
//! [`SwitchboardError`] variants.

use std::time::Duration;

use serde_json::Value;
use switchboard_config::model::{PlatformConfig, RetryConfig};
use switchboard_core::SwitchboardError;
use tracing::{debug, warn};

use crate::classify;
use crate::retry::{is_retryable_status, RetryPolicy};

/// Result of one platform call: the decoded JSON payload or a classified failure.
pub type RequestOutcome = Result<Value, SwitchboardError>;

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Overrides the policy's attempt budget for this call.
    pub max_attempts: Option<u32>,
    /// Send action parameters in the query string instead of the form body.
    pub params_in_query: bool,
}

/// Identity parameters sent with every call.
#[derive(Debug, Clone)]
struct Identity {
    key: String,
    account_id: String,
    phone_id: String,
}

/// Client for the platform RPC endpoint.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    identity: Identity,
    policy: RetryPolicy,
}

impl PlatformClient {
    /// Creates a client from validated configuration.
    pub fn from_config(
        platform: &PlatformConfig,
        retry: &RetryConfig,
    ) -> Result<Self, SwitchboardError> {
        let base_url = platform.resolved_api_url().ok_or_else(|| {
            SwitchboardError::Config("platform.server or platform.api_base_url is required".into())
        })?;

        let required = |value: &Option<String>, key: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| SwitchboardError::Config(format!("platform.{key} is required")))
        };

        let identity = Identity {
            key: required(&platform.api_key, "api_key")?,
            account_id: required(&platform.account_id, "account_id")?,
            phone_id: required(&platform.phone_id, "phone_id")?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(retry.request_timeout_secs))
            .build()
            .map_err(|e| SwitchboardError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            identity,
            policy: RetryPolicy::from_config(retry),
        })
    }

    /// Replaces the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Calls `action` with `params`, retrying transient failures.
    ///
    /// Fails only after the retry budget is exhausted, or immediately for
    /// non-retryable statuses, business failures, and undecodable bodies.
    pub async fn call(
        &self,
        action: &str,
        params: &[(&str, &str)],
        options: CallOptions,
    ) -> RequestOutcome {
        let attempts = options
            .max_attempts
            .unwrap_or(self.policy.max_attempts)
            .max(1);

        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.identity.key.as_str()),
            ("account_id", self.identity.account_id.as_str()),
            ("phone_id", self.identity.phone_id.as_str()),
            ("action", action),
        ];
        let body: &[(&str, &str)] = if options.params_in_query {
            query.extend_from_slice(params);
            &[]
        } else {
            params
        };

        for attempt in 1..=attempts {
            let is_last = attempt == attempts;

            let response = match self
                .http
                .post(&self.base_url)
                .query(&query)
                .form(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if is_last => {
                    return Err(SwitchboardError::Connection {
                        attempts,
                        message: e.to_string(),
                        source: Some(Box::new(e)),
                    });
                }
                Err(e) => {
                    self.back_off(action, attempt, &e.to_string()).await;
                    continue;
                }
            };

            let status = response.status();
            debug!(action, status = %status, attempt, "platform response received");

            if status.is_success() {
                match response.text().await {
                    Ok(text) => return decode_payload(&text),
                    Err(e) if e.is_decode() => {
                        return Err(SwitchboardError::Decode {
                            message: format!("failed to decode response body: {e}"),
                            source: Some(Box::new(e)),
                        });
                    }
                    Err(e) if is_last => {
                        return Err(SwitchboardError::Connection {
                            attempts,
                            message: format!("response body interrupted: {e}"),
                            source: Some(Box::new(e)),
                        });
                    }
                    Err(e) => {
                        self.back_off(action, attempt, &format!("response body interrupted: {e}"))
                            .await;
                        continue;
                    }
                }
            }

            if is_retryable_status(status.as_u16()) && !is_last {
                self.back_off(action, attempt, &format!("HTTP {status}")).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let mut message = classify::describe_status(status.as_u16(), &body);
            if is_retryable_status(status.as_u16()) {
                message = format!("{message} (gave up after {attempts} attempt(s))");
            }
            return Err(SwitchboardError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // The loop always returns on its final attempt.
        Err(SwitchboardError::Internal(format!(
            "{action}: retry loop exited without an outcome"
        )))
    }

    async fn back_off(&self, action: &str, attempt: u32, reason: &str) {
        let delay = self.policy.delay_for(attempt);
        warn!(
            action,
            attempt,
            delay_ms = delay.as_millis() as u64,
            reason,
            "platform call failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Decodes a success body, surfacing `success: false` as a business failure.
fn decode_payload(text: &str) -> RequestOutcome {
    let payload: Value = serde_json::from_str(text).map_err(|e| SwitchboardError::Decode {
        message: format!("platform returned invalid JSON: {e}"),
        source: Some(Box::new(e)),
    })?;

    match classify::business_failure(&payload) {
        Some(message) => Err(SwitchboardError::Api { message }),
        None => Ok(payload),
    }
}
