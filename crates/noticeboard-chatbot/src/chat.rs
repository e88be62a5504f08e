//! The chat-completion collaborator and its Ollama-backed implementation.

use std::future::Future;
use std::path::PathBuf;

use noticeboard_core::PortalSnapshot;

use crate::error::ChatbotError;
use crate::ollama::OllamaClient;
use crate::prompt::{system_prompt, transcript};
use crate::types::ChatMessage;

/// Something that answers a query given prior conversation turns.
///
/// Sentiment analysis and summarization only depend on this seam, so they can
/// be exercised without a live model.
pub trait ChatCompletion {
    fn complete(
        &self,
        query: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String, ChatbotError>> + Send;
}

/// Where the chatbot's portal context comes from.
#[derive(Debug, Clone)]
pub enum ContextSource {
    /// Fixed snapshot held in memory.
    Static(PortalSnapshot),
    /// YAML snapshot re-read on every query so edits show up without a restart.
    File(PathBuf),
}

impl ContextSource {
    async fn load(&self) -> Result<PortalSnapshot, ChatbotError> {
        match self {
            ContextSource::Static(snapshot) => Ok(snapshot.clone()),
            ContextSource::File(path) => {
                let path = path.clone();
                let snapshot =
                    tokio::task::spawn_blocking(move || noticeboard_core::load_snapshot(&path))
                        .await
                        .map_err(|e| {
                            ChatbotError::Internal(format!("snapshot load task failed: {e}"))
                        })??;
                Ok(snapshot)
            }
        }
    }
}

impl Default for ContextSource {
    fn default() -> Self {
        ContextSource::Static(PortalSnapshot::default())
    }
}

/// Portal assistant: snapshot context plus an Ollama model.
#[derive(Debug, Clone)]
pub struct Chatbot {
    client: OllamaClient,
    context: ContextSource,
}

impl Chatbot {
    #[must_use]
    pub fn new(client: OllamaClient, context: ContextSource) -> Self {
        Self { client, context }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Builds the full prompt for `query` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatbotError::InvalidInput`] for an empty query,
    /// [`ChatbotError::Context`] if the snapshot cannot be loaded and
    /// [`ChatbotError::Internal`] if it cannot be rendered into the prompt.
    pub async fn build_prompt(
        &self,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatbotError> {
        if query.trim().is_empty() {
            return Err(ChatbotError::InvalidInput("Query is required"));
        }

        let snapshot = self.context.load().await?;
        let system = system_prompt(&snapshot)
            .map_err(|e| ChatbotError::Internal(format!("snapshot serialization failed: {e}")))?;

        Ok(transcript(&system, history, query))
    }
}

impl ChatCompletion for Chatbot {
    async fn complete(
        &self,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatbotError> {
        let prompt = self.build_prompt(query, history).await?;
        let reply = self.client.generate(&prompt).await?;
        tracing::debug!(
            model = self.client.model(),
            history_len = history.len(),
            reply_chars = reply.len(),
            "chatbot reply received"
        );
        Ok(reply)
    }
}
