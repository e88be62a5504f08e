//! TL;DR summaries over the chat collaborator.

use crate::chat::ChatCompletion;
use crate::error::ChatbotError;

fn summary_prompt(text: &str) -> String {
    format!(
        "Please provide a concise summary (TL;DR) of the following text. \
         Focus on the key points and main ideas. The text is: \"{text}\""
    )
}

/// Ask the model for a concise summary of `text`.
///
/// # Errors
///
/// Returns [`ChatbotError::InvalidInput`] for empty text and
/// [`ChatbotError::SummaryFailed`] if the collaborator fails.
pub async fn summarize<C>(chat: &C, text: &str) -> Result<String, ChatbotError>
where
    C: ChatCompletion + Sync,
{
    if text.trim().is_empty() {
        return Err(ChatbotError::InvalidInput("Text is required"));
    }

    chat.complete(&summary_prompt(text), &[])
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "summary model call failed");
            ChatbotError::SummaryFailed(e.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    struct EchoChat;

    impl ChatCompletion for EchoChat {
        async fn complete(
            &self,
            query: &str,
            history: &[ChatMessage],
        ) -> Result<String, ChatbotError> {
            assert!(history.is_empty());
            Ok(format!("summary of [{query}]"))
        }
    }

    struct DownChat;

    impl ChatCompletion for DownChat {
        async fn complete(&self, _: &str, _: &[ChatMessage]) -> Result<String, ChatbotError> {
            Err(ChatbotError::UpstreamUnavailable("timed out".to_string()))
        }
    }

    #[tokio::test]
    async fn returns_model_reply_for_tldr_prompt() {
        let summary = summarize(&EchoChat, "Lot B closes in April.").await.expect("summary");
        assert!(summary.starts_with("summary of [Please provide a concise summary (TL;DR)"));
        assert!(summary.contains("\"Lot B closes in April.\""));
    }

    #[tokio::test]
    async fn empty_text_is_invalid_input() {
        let err = summarize(&EchoChat, "").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn upstream_failure_becomes_summary_failed() {
        let err = summarize(&DownChat, "anything").await.unwrap_err();
        assert!(matches!(err, ChatbotError::SummaryFailed(ref m) if m.contains("timed out")));
    }
}
