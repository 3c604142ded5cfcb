//! Discovery - lists the gateway's providers and each provider's models.
//!
//! Endpoints:
//! - `GET {base}/v1/providers`: array of `{id, ...}` objects
//! - `GET {base}/api/{provider}/models`: `{data: [model, ...]}`
//!
//! Failures never propagate out of this stage: a failed provider listing
//! yields no providers, a failed model listing yields no models for that
//! provider only.


use crate::error::ProbeError;
use crate::http::{create_client_with_timeout, DISCOVERY_TIMEOUT};
use crate::model::{ModelDescriptor, ProbeTarget};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

/// Provider id meaning "no specific provider"; never probed.
pub const EXCLUDED_PROVIDER: &str = "Custom";

/// Discovery client. Owns one connection pool for the discovery phase.
#[derive(Clone)]
pub struct Discovery {
    client: Client,
    base_url: String,
}

impl Discovery {
    pub fn new(base_url: &str) -> Result<Self, ProbeError> {
        Self::with_timeout(base_url, DISCOVERY_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ProbeError> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch provider ids, excluding empty ids and `Custom`.
    pub async fn fetch_providers(&self) -> Vec<String> {
        match self.try_fetch_providers().await {
            Ok(ids) => {
                info!(
                    "Found {} providers from /v1/providers (excluded '{}')",
                    ids.len(),
                    EXCLUDED_PROVIDER
                );
                for id in &ids {
                    info!("   - {}", id);
                }
                ids
            }
            Err(ProbeError::Status(code)) => {
                error!("Failed to fetch providers: {}", code);
                Vec::new()
            }
            Err(e) => {
                error!("Error fetching providers: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_providers(&self) -> Result<Vec<String>, ProbeError> {
        let url = format!("{}/v1/providers", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let data: Value = response.json().await?;
        extract_provider_ids(&data)
    }

    /// Fetch the models of one provider. Any failure yields an empty list.
    pub async fn fetch_provider_models(&self, provider_id: &str) -> Vec<ModelDescriptor> {
        let url = format!("{}/api/{}/models", self.base_url, provider_id);
        info!("   Fetching models from: {}", url);

        match self.try_fetch_provider_models(&url).await {
            Ok(models) => {
                info!("   {}: {} models found", provider_id, models.len());
                models
            }
            Err(ProbeError::Status(code)) => {
                warn!("   {}: Failed to fetch models - {}", provider_id, code);
                Vec::new()
            }
            Err(e) => {
                warn!("   {}: Error - {}", provider_id, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_provider_models(&self, url: &str) -> Result<Vec<ModelDescriptor>, ProbeError> {
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let data: Value = response.json().await?;
        extract_models(&data)
    }

    /// Build the flat (provider, model) list, providers in the given order
    /// and models in the order each provider returned them.
    pub async fn discover(&self, provider_ids: &[String]) -> Vec<ProbeTarget> {
        let mut targets = Vec::new();

        for provider_id in provider_ids {
            info!("Processing provider: {}", provider_id);
            let models = self.fetch_provider_models(provider_id).await;

            for model in models {
                info!("      Found model: {} (type: {})", model.id, model.kind_or_unknown());
                targets.push(ProbeTarget {
                    provider: provider_id.clone(),
                    model,
                });
            }
        }

        targets
    }
}

/// Extract usable provider ids from a `/v1/providers` body.
pub fn extract_provider_ids(data: &Value) -> Result<Vec<String>, ProbeError> {
    let providers = data
        .as_array()
        .ok_or_else(|| ProbeError::Parse("expected a JSON array of providers".to_string()))?;

    Ok(providers
        .iter()
        .filter_map(|provider| provider.get("id").and_then(Value::as_str))
        .filter(|id| !id.is_empty() && *id != EXCLUDED_PROVIDER)
        .map(str::to_string)
        .collect())
}

/// Extract model descriptors from a `/api/{provider}/models` body.
/// Entries that are not model objects are skipped.
pub fn extract_models(data: &Value) -> Result<Vec<ModelDescriptor>, ProbeError> {
    let object = data
        .as_object()
        .ok_or_else(|| ProbeError::Parse("expected a JSON object with a data array".to_string()))?;

    let Some(entries) = object.get("data").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<ModelDescriptor>(entry.clone()) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("Skipping malformed model entry {}: {}", entry, e);
                None
            }
        })
        .collect())
}
