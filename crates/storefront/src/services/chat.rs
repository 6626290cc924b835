//! Stateless relay to the backend chat assistant.
//!
//! The backend owns the model and the prompt; this client only forwards the
//! user's message together with a sliding window of recent history and hands
//! back the reply.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};

/// Size of the forwarded history window, counting the message being sent.
const HISTORY_WINDOW: usize = 10;

/// Errors that can occur in the chat relay.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Backend call failed.
    #[error("chat backend error: {0}")]
    Api(#[from] ApiError),

    /// Message was empty after trimming; no call was made.
    #[error("message is empty")]
    EmptyMessage,
}

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// One turn of the conversation, as kept by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    /// Convenience constructor for a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Convenience constructor for a bot turn.
    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
        }
    }
}

/// Client for the backend chat endpoint.
#[derive(Clone)]
pub struct ChatRelay {
    api: ApiClient,
}

impl ChatRelay {
    /// Create a relay over the backend API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Send a message and return the assistant's reply.
    ///
    /// The forwarded history is the conversation including the message being
    /// sent, trimmed to the last [`HISTORY_WINDOW`] turns - so at most nine
    /// prior turns accompany the new one.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` without a network call for blank
    /// input, or `ChatError::Api` when the backend call fails.
    #[instrument(skip(self, message, history), fields(history_len = history.len()))]
    pub async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            message: &'a str,
            history: &'a [ChatTurn],
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            reply: String,
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let start = history.len().saturating_sub(HISTORY_WINDOW - 1);
        let mut window = history.get(start..).unwrap_or(history).to_vec();
        window.push(ChatTurn::user(message));

        let response: ChatResponse = self
            .api
            .post_json(
                "chat/",
                &ChatRequest {
                    message,
                    history: &window,
                },
            )
            .await?;

        Ok(response.reply)
    }
}
