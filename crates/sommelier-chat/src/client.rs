//! HTTP implementation of [`SommelierService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sommelier_core::config::ServiceConfig;
use sommelier_core::types::{TasteProfile, WineRecord};

use crate::error::TransportError;
use crate::service::{ChatReply, ChatRequest, ProfileRecommendations, SommelierService};

/// Error body shape used by the service for non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// reqwest-backed service client.
pub struct HttpSommelierService {
    client: Client,
    chat_url: String,
    recommendations_url: String,
    timeout_secs: u64,
}

impl HttpSommelierService {
    pub fn new(config: &ServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            chat_url: config.endpoint(&config.chat_path),
            recommendations_url: config.endpoint(&config.recommendations_path),
            timeout_secs: config.timeout_secs,
        }
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.detail)
                .and_then(|d| match d {
                    Value::String(s) => Some(s),
                    _ => None,
                });
            tracing::warn!(url, status = status.as_u16(), detail = ?detail, "Service returned error status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let text = response.text().await.map_err(|e| self.map_error(e))?;
        serde_json::from_str(&text).map_err(|e| TransportError::InvalidBody(e.to_string()))
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout_secs)
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl SommelierService for HttpSommelierService {
    async fn ask(&self, request: &ChatRequest) -> Result<String, TransportError> {
        tracing::debug!(
            url = %self.chat_url,
            context_wines = request.last_recommendations.as_ref().map_or(0, Vec::len),
            "Sending chat request"
        );
        let reply: ChatReply = self.post_json(&self.chat_url, request).await?;
        Ok(reply.response)
    }

    async fn recommend_for_profile(
        &self,
        profile: &TasteProfile,
    ) -> Result<Vec<WineRecord>, TransportError> {
        let reply: ProfileRecommendations =
            self.post_json(&self.recommendations_url, profile).await?;
        tracing::debug!(
            status = %reply.status,
            wines = reply.recommendations.len(),
            "Profile recommendations received"
        );
        Ok(reply.recommendations)
    }
}
