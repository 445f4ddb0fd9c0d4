use crate::domain::model::AdviceRecord;
use crate::domain::ports::{AdviceSource, ConfigProvider};
use crate::utils::error::{AdviceError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.adviceslip.com/advice";

/// Advice Slip API 的回應外層：`{"slip": {"id": 1, "advice": "..."}}`
#[derive(Debug, Deserialize)]
struct SlipEnvelope {
    slip: AdviceRecord,
}

#[derive(Debug, Clone)]
pub struct AdviceSlipClient {
    client: Client,
    endpoint: String,
}

impl AdviceSlipClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::with_timeout(config.api_endpoint(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AdviceSource for AdviceSlipClient {
    async fn fetch_advice(&self) -> Result<AdviceRecord> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(AdviceError::StatusError {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: SlipEnvelope =
            serde_json::from_str(&body).map_err(|e| AdviceError::MalformedResponse {
                message: e.to_string(),
            })?;

        if envelope.slip.advice.trim().is_empty() {
            return Err(AdviceError::MalformedResponse {
                message: format!("advice #{} has empty text", envelope.slip.id),
            });
        }

        Ok(envelope.slip)
    }
}
