// Bridge module - one user action, one request to the tutoring backend
//
// The bridge turns an endpoint + payload into a single HTTP POST, shows a
// loading placeholder while it is in flight, and routes either the decoded
// reply or an error message to a display sink. Every call is independent:
// no retries, no de-duplication, no cancellation of earlier calls.

pub mod envelope;
mod error;

#[cfg(test)]
mod tests;

pub use envelope::Reply;
pub use error::BridgeError;

use crate::config::BackendConfig;
use crate::markup;
use crate::sink::{DisplaySink, Notice};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

/// Placeholder shown while a request is in flight
pub const THINKING_PLACEHOLDER: &str = "<i>Thinking...</i>";

/// Notification raised for any failed request
pub const FAILURE_NOTICE: &str = "Failed to connect to AI Tutor Backend.";

/// Remote operations offered by the tutoring backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Explain code, or debug it when `error_output` is present
    Analyze,
    /// Multiple-choice quiz about code or a topic
    Quiz,
    /// Follow-up conceptual question
    Followup,
    /// Library summary from ingested documentation
    Docs,
}

impl Endpoint {
    /// Path segment appended to the base address
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "/analyze",
            Endpoint::Quiz => "/quiz",
            Endpoint::Followup => "/followup",
            Endpoint::Docs => "/docs",
        }
    }

    /// Envelope field this endpoint answers with
    pub fn reply_field(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "analysis",
            Endpoint::Quiz => "quiz",
            Endpoint::Followup => "answer",
            Endpoint::Docs => "summary",
        }
    }
}

/// Request payload: a schemaless JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string
    #[cfg(test)]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// HTTP bridge to the tutoring backend
#[derive(Debug, Clone)]
pub struct Bridge {
    client: reqwest::Client,
    /// Base address as configured (shown to the user on failure)
    base_url: String,
}

impl Bridge {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base address as configured
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint
    ///
    /// Trailing slashes on the base are dropped so `http://host:8000/` and
    /// `http://host:8000` both produce `http://host:8000/analyze`.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    /// Send one request and decode the reply, without touching any sink
    pub async fn request(&self, endpoint: Endpoint, payload: &Payload) -> Result<Reply, BridgeError> {
        let url = self.url_for(endpoint);
        let started = Instant::now();

        tracing::debug!(url = %url, fields = payload.len(), "POST");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(BridgeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let envelope: Value = response.json().await.map_err(BridgeError::Decode)?;
        let reply = Reply::for_endpoint(endpoint, &envelope);

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            empty = reply.is_empty(),
            "Backend replied"
        );
        if reply.is_empty() {
            tracing::warn!("{} reply carried no display text", endpoint.path());
        }

        Ok(reply)
    }

    /// Fire one request and route the outcome to `sink`
    ///
    /// Never fails: every error is logged, raised as a notification and shown
    /// as an error entry naming the backend address.
    pub async fn send(&self, endpoint: Endpoint, payload: &Payload, sink: &dyn DisplaySink) {
        sink.show(THINKING_PLACEHOLDER);

        match self.request(endpoint, payload).await {
            Ok(reply) => sink.show(&reply.to_display()),
            Err(e) => {
                tracing::error!("{} failed: {}", endpoint.path(), e);
                sink.notify(Notice::error(FAILURE_NOTICE));
                sink.show(&self.failure_display());
            }
        }
    }

    /// Error entry shown when the backend cannot be reached
    pub fn failure_display(&self) -> String {
        format!(
            "{} Could not connect to backend at {}",
            markup::bold("Error:"),
            self.base_url
        )
    }

    /// Connectivity check for the test-backend command
    ///
    /// Any HTTP answer counts as reachable; only transport errors fail.
    pub async fn probe(&self) -> Result<reqwest::StatusCode, BridgeError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(BridgeError::Transport)?;
        Ok(response.status())
    }
}
