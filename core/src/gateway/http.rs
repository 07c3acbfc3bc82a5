use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::gateway::{Gateway, GatewayAction};

const DEFAULT_BASE_URL: &str = "https://maps-gateway.googleapis.com/v1/execute";

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    action: &'a str,
    key: &'a str,
    params: &'a Value,
}

/// Gateway backed by a single HTTP endpoint that multiplexes all location
/// actions behind one `action` discriminator.
pub struct HttpGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call(&self, action: GatewayAction, params: Value) -> Result<Value> {
        let body = GatewayRequest {
            action: action.as_str(),
            key: &self.api_key,
            params: &params,
        };

        debug!(action = action.as_str(), "calling location gateway");

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Gateway request for '{}' failed", action.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!(
                "Gateway returned {} for '{}': {}",
                status,
                action.as_str(),
                text
            );
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("Failed to decode gateway response for '{}'", action.as_str()))
    }
}
