//! Client side of the best-move service.
//!
//! The controller never awaits anything itself. It hands out a
//! [`BestMoveRequest`]; whoever runs the event loop calls [`resolve`]
//! and feeds the resulting [`Event`] back into the controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::RecommenderConfig;
use crate::controller::Event;
use crate::error::RecommenderError;

/// Identifies one outstanding request so late answers can be told apart
pub type RequestId = u64;

/// Issued by the controller after each White move that leaves the game open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMoveRequest {
    pub id: RequestId,
    pub fen: String,
}

/// Body of `POST /get_best_move`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BestMovePayload {
    pub fen: String,
    /// Seconds the service may think; omitted to use its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<f64>,
}

/// Answer of `POST /get_best_move`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestMoveReply {
    pub best_move: String,
}

/// Answer of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Anything that can suggest a move for a position
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn best_move(&self, fen: &str) -> Result<String, RecommenderError>;
}

/// Run one request to completion and wrap the outcome as a controller event
pub async fn resolve<R>(recommender: &R, request: BestMoveRequest) -> Event
where
    R: Recommender + ?Sized,
{
    let outcome = recommender.best_move(&request.fen).await;
    Event::BestMove {
        request: request.id,
        outcome,
    }
}

/// JSON-over-HTTP recommender
#[derive(Debug, Clone)]
pub struct HttpRecommender {
    client: reqwest::Client,
    base_url: String,
    time_limit: Option<f64>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl HttpRecommender {
    pub fn new(config: &RecommenderConfig) -> Result<Self, RecommenderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            time_limit: config.time_limit,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthReply, RecommenderError> {
        let reply = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthReply>()
            .await?;
        debug!(status = %reply.status, "recommender health");
        Ok(reply)
    }

    async fn request_once(&self, fen: &str) -> Result<String, RecommenderError> {
        let payload = BestMovePayload {
            fen: fen.to_string(),
            time_limit: self.time_limit,
        };
        let reply = self
            .client
            .post(format!("{}/get_best_move", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<BestMoveReply>()
            .await?;

        let best_move = reply.best_move.trim();
        if best_move.is_empty() {
            return Err(RecommenderError::MalformedBody("empty best_move".to_string()));
        }
        Ok(best_move.to_string())
    }
}

#[async_trait]
impl Recommender for HttpRecommender {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn best_move(&self, fen: &str) -> Result<String, RecommenderError> {
        let mut attempt = 1;
        loop {
            match self.request_once(fen).await {
                Ok(best_move) => {
                    debug!(%best_move, attempt, "recommender answered");
                    return Ok(best_move);
                }
                Err(err) if attempt < self.max_attempts => {
                    warn!(%err, attempt, "recommender request failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
#[path = "recommender_tests.rs"]
mod recommender_tests;
