//! Concept chat client.
//!
//! Single request/response call against `/chat/concept`. Unlike uploads
//! there is no retry or backoff here; a chat turn is cheap to re-issue and
//! the caller decides whether to try again.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::config::Settings;
use crate::error::{ApiError, Result};
use crate::models::Concept;

/// Endpoint path for concept chat.
const CHAT_CONCEPT_PATH: &str = "/chat/concept";

/// Chat turns sent to the server per request; older history is dropped.
const HISTORY_WINDOW: usize = 10;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of an ongoing conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    concept_name: &'a str,
    concept_description: &'a str,
    concept_facts: &'a [String],
    message: &'a str,
    chat_history: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Client for the concept chat endpoint.
pub struct ChatClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
}

impl ChatClient {
    /// Build a client with the production reqwest transport.
    ///
    /// Chat answers come back in seconds, so the transport uses a short
    /// fixed timeout rather than the upload timeout from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(30), &settings.user_agent)?;
        Self::with_transport(settings, Arc::new(transport))
    }

    /// Build a client over an injected transport.
    pub fn with_transport(settings: &Settings, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            transport,
            endpoint: super::endpoint_url(&settings.base_url, CHAT_CONCEPT_PATH)?,
        })
    }

    /// Ask a question about a concept, carrying recent conversation history.
    ///
    /// Only the most recent [`HISTORY_WINDOW`] turns are sent. Returns the
    /// model's reply text.
    pub async fn ask(
        &self,
        concept: &Concept,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String> {
        let window_start = history.len().saturating_sub(HISTORY_WINDOW);
        let body = ChatRequest {
            concept_name: &concept.name,
            concept_description: &concept.description,
            concept_facts: &concept.key_facts,
            message,
            chat_history: &history[window_start..],
        };

        let request = HttpRequest {
            url: self.endpoint.clone(),
            content_type: "application/json".to_string(),
            body: serde_json::to_vec(&body).map_err(ApiError::Decoding)?,
        };

        debug!(concept = %concept.id, history_turns = history.len() - window_start, "sending chat turn");

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                body: response.body_text(),
            });
        }

        let decoded: ChatResponse =
            serde_json::from_slice(&response.body).map_err(ApiError::Decoding)?;
        Ok(decoded.response)
    }
}
