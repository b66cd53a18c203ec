use std::sync::Arc;

use tracing::{debug, warn};

use super::{client::ChatProvider, dto::ChatMessage, transcript::TranscriptStore};
use crate::error::AppError;

pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    transcripts: TranscriptStore,
    system_prompt: String,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ChatProvider>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            transcripts: TranscriptStore::new(),
            system_prompt: system_prompt.into(),
        }
    }

    #[cfg(test)]
    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    /// Appends the user turn, asks the provider for a reply and returns the
    /// contents of every turn except the system prompt.
    pub async fn chat(&self, user_id: i64, message: &str) -> Result<Vec<String>, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::validation("message must not be empty"));
        }

        let transcript = self
            .transcripts
            .get_or_create(user_id, &self.system_prompt)
            .await;
        let mut turns = transcript.lock().await;
        turns.push(ChatMessage::user(message));

        match self.provider.complete(&turns).await {
            Ok(reply) => {
                debug!(user_id, turns = turns.len() + 1, "chat reply received");
                turns.push(reply);
            }
            Err(e) => {
                // Drop the unanswered turn so a retry doesn't duplicate it.
                turns.pop();
                warn!(user_id, error = %e, "chat provider failed");
                return Err(AppError::Provider(e.to_string()));
            }
        }

        Ok(turns.iter().skip(1).map(|m| m.content.clone()).collect())
    }
}
