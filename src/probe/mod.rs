//! Prober - sends one minimal chat completion per discovered model.
//!
//! Probes run strictly one after another with a fixed pause between them.
//! Every outcome, including timeouts and transport errors, becomes a
//! [`ProbeResult`]; nothing is retried.


use crate::config::LogVerbosity;
use crate::error::ProbeError;
use crate::http::{create_client, PROBE_DELAY, PROBE_TIMEOUT};
use crate::logger::format_probe_result;
use crate::media::classify;
use crate::model::{ModelDescriptor, ProbeResult, ProbeTarget};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::info;

/// Prompt sent to every model.
pub const PROBE_PROMPT: &str = "Hello! Reply with 'Yes' if you can respond.";

/// Output token cap for a probe.
pub const DEFAULT_MAX_TOKENS: u32 = 10;

/// Probe client. Owns one connection pool for the whole probe phase.
#[derive(Clone)]
pub struct Prober {
    client: Client,
    base_url: String,
    timeout: Duration,
    delay: Duration,
    max_tokens: u32,
    verbosity: LogVerbosity,
}

impl Prober {
    pub fn new(base_url: &str) -> Result<Self, ProbeError> {
        Ok(Self {
            client: create_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: PROBE_TIMEOUT,
            delay: PROBE_DELAY,
            max_tokens: DEFAULT_MAX_TOKENS,
            verbosity: LogVerbosity::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum pause between two probe requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Probe a single model and classify the outcome.
    ///
    /// - 200 with a non-empty `choices` array: working
    /// - 200 without `choices`: failed, no error text
    /// - other status: `HTTP <status>`
    /// - timeout: `Timeout`
    /// - anything else: error text cut to 100 characters
    pub async fn probe_model(&self, provider_id: &str, model: &ModelDescriptor) -> ProbeResult {
        let media_type = classify(model);
        let start = Instant::now();

        let outcome = timeout(self.timeout, self.send_probe(provider_id, &model.id)).await;
        let response_time = start.elapsed();

        let (working, error) = match outcome {
            Ok(Ok(working)) => (working, None),
            Ok(Err(e)) => (false, Some(e.label())),
            Err(_) => (false, Some(ProbeError::Timeout.label())),
        };

        ProbeResult {
            provider: provider_id.to_string(),
            model: model.id.clone(),
            working,
            response_time,
            error,
            media_type,
        }
    }

    async fn send_probe(&self, provider_id: &str, model_id: &str) -> Result<bool, ProbeError> {
        let endpoint = format!("{}/api/{}/chat/completions", self.base_url, provider_id);
        let payload = json!({
            "model": model_id,
            "messages": [{"role": "user", "content": PROBE_PROMPT}],
            "stream": false,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let data: Value = response.json().await?;
        Ok(has_choices(&data))
    }

    /// Probe every target in order, pausing between calls.
    pub async fn probe_all(&self, targets: &[ProbeTarget]) -> Vec<ProbeResult> {
        let total = targets.len();
        let mut results = Vec::with_capacity(total);

        for (i, target) in targets.iter().enumerate() {
            info!("Test {}/{}: {} | {}", i + 1, total, target.provider, target.model.id);

            let result = self.probe_model(&target.provider, &target.model).await;
            info!("{}", format_probe_result(&result, &self.verbosity));
            results.push(result);

            tokio::time::sleep(self.delay).await;
        }

        results
    }
}

/// True when the body carries a non-empty `choices` array.
pub fn has_choices(data: &Value) -> bool {
    data.get("choices")
        .and_then(Value::as_array)
        .is_some_and(|choices| !choices.is_empty())
}
