use async_trait::async_trait;
use reqwest::Client;

use seer_core::upstream::{UpstreamClient, UpstreamError, UpstreamResponse};

use crate::app_config::UpstreamConfig;

/// Reqwest-backed client for third-party endpoints. Non-2xx answers are
/// returned as-is; only transport failures are errors here.
#[derive(Clone)]
pub struct HttpUpstreamClient {
    client: Client,
    user_agent: String,
}

impl HttpUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn get(&self, endpoint: &str) -> Result<UpstreamResponse, UpstreamError> {
        let transport = |e: reqwest::Error| UpstreamError::Transport {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(endpoint)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        tracing::debug!("GET {} -> {}", endpoint, status);

        Ok(UpstreamResponse { status, body })
    }
}
