//! Conversational backend client
//!
//! Implements the ConversationBridge trait over the backend's `/api/chat`
//! endpoint. The backend owns the language model and the itinerary
//! computation; this client only ships the message, the current trip context
//! and a window of conversation history, and decodes the three response
//! shapes (plain reply, reply with itinerary, error object).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::domain::Itinerary;

use super::BridgeError;
use super::error::is_retryable_status;
use super::types::{BackendErrorBody, ChatResponse, ConversationEntry};

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// The conversational backend, consumed as an opaque request/response API
#[async_trait]
pub trait ConversationBridge: Send + Sync {
    /// Send one user message with the current trip context; returns the
    /// assistant reply and, when this turn produced one, a new itinerary.
    async fn send(
        &self,
        message: &str,
        trip: &Itinerary,
        history: &[ConversationEntry],
    ) -> Result<ChatResponse, BridgeError>;
}

/// HTTP client for the conversational backend
pub struct ChatClient {
    base_url: String,
    http: Client,
    history_window: usize,
}

impl ChatClient {
    /// Create a new client from configuration
    pub fn from_config(config: &BackendConfig, history_window: usize) -> Result<Self, BridgeError> {
        debug!(base_url = %config.base_url, history_window, "ChatClient::from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(BridgeError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            history_window,
        })
    }

    /// Build the request body for the chat endpoint
    fn build_request_body(
        &self,
        message: &str,
        trip: &Itinerary,
        history: &[ConversationEntry],
    ) -> serde_json::Value {
        debug!(history_len = history.len(), "build_request_body: called");
        let start = history.len().saturating_sub(self.history_window);

        serde_json::json!({
            "message": message,
            "trip_context": trip,
            "has_itinerary": !trip.destinations.is_empty(),
            "conversation_history": &history[start..],
        })
    }
}

#[async_trait]
impl ConversationBridge for ChatClient {
    async fn send(
        &self,
        message: &str,
        trip: &Itinerary,
        history: &[ConversationEntry],
    ) -> Result<ChatResponse, BridgeError> {
        debug!(message_len = message.len(), "ChatClient::send: called");
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_request_body(message, trip, history);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "ChatClient::send: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(url.clone()).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "ChatClient::send: network error");
                    last_error = Some(BridgeError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                // The backend reports failures as {"error": "..."} with a non-2xx status
                let message = serde_json::from_str::<BackendErrorBody>(&text)
                    .map(|b| b.error)
                    .unwrap_or(text);

                if is_retryable_status(status) && attempt < MAX_RETRIES {
                    debug!(attempt, status, "ChatClient::send: retryable error");
                    last_error = Some(BridgeError::Backend { status, message });
                    continue;
                }

                debug!(status, %message, "ChatClient::send: backend error");
                return Err(BridgeError::Backend { status, message });
            }

            debug!("ChatClient::send: success");
            let chat_response: ChatResponse = response.json().await?;
            return Ok(chat_response);
        }

        Err(last_error.unwrap_or_else(|| BridgeError::InvalidResponse("Max retries exceeded".to_string())))
    }
}
