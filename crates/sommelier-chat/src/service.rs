//! Remote recommendation service contract.
//!
//! The session controller talks to the service only through
//! [`SommelierService`], so tests and alternative transports can stand in
//! for the HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sommelier_core::types::{TasteProfile, WineRecord};

use crate::error::TransportError;

/// Outbound chat request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Raw user input.
    pub message: String,
    pub taste_profile: TasteProfile,
    /// Wines from the most recent recommendation, for follow-up references.
    pub last_recommendations: Option<Vec<WineRecord>>,
}

/// Chat endpoint response. `response` is itself a JSON-encoded payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Profile recommendation endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecommendations {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub recommendations: Vec<WineRecord>,
}

#[async_trait]
pub trait SommelierService: Send + Sync {
    /// Send one chat turn and return the reply payload string.
    async fn ask(&self, request: &ChatRequest) -> Result<String, TransportError>;

    /// Fetch wines matching a profile, outside of any conversation.
    async fn recommend_for_profile(
        &self,
        profile: &TasteProfile,
    ) -> Result<Vec<WineRecord>, TransportError>;
}
