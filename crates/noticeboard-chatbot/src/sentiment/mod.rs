//! Sentiment analysis over the chat collaborator.

mod parse;

pub use parse::{
    parse_sentiment_reply, GradedSentiment, Sentiment, SentimentResult, DEFAULT_ANALYSIS,
    NEUTRAL_SCORE,
};

use crate::chat::ChatCompletion;
use crate::error::ChatbotError;

/// Instruction prompt asking the model for a graded label, a 0-100 score and
/// a short reason.
#[must_use]
pub fn sentiment_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of this text and provide a precise analysis. Consider:\n\
         1. Overall sentiment (very positive, positive, slightly positive, neutral, \
         slightly negative, negative, very negative)\n\
         2. Brief reason (1-2 sentences)\n\
         3. Score (0-100, where 0 is extremely negative and 100 is extremely positive)\n\
         \n\
         Text: \"{text}\"\n\
         \n\
         Be precise in your sentiment assessment and score."
    )
}

/// Classify `text` by asking the model and scraping its reply.
///
/// The prompt is sent with an empty history. Parsing never fails; see
/// [`parse_sentiment_reply`].
///
/// # Errors
///
/// Returns [`ChatbotError::InvalidInput`] for empty text, before any model
/// call, and [`ChatbotError::ExtractionFailed`] if the collaborator fails.
pub async fn analyze_sentiment<C>(chat: &C, text: &str) -> Result<SentimentResult, ChatbotError>
where
    C: ChatCompletion + Sync,
{
    if text.trim().is_empty() {
        return Err(ChatbotError::InvalidInput("Text is required"));
    }

    let reply = chat
        .complete(&sentiment_prompt(text), &[])
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "sentiment analysis model call failed");
            ChatbotError::ExtractionFailed(e.to_string())
        })?;

    let result = parse_sentiment_reply(&reply);
    tracing::info!(
        sentiment = ?result.sentiment,
        score = result.score,
        "sentiment analysis complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::types::ChatMessage;

    /// Canned collaborator recording what it was asked.
    struct ScriptedChat {
        reply: Result<&'static str, &'static str>,
        calls: AtomicUsize,
        last_query: Mutex<Option<(String, usize)>>,
    }

    impl ScriptedChat {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }
    }

    impl ChatCompletion for ScriptedChat {
        async fn complete(
            &self,
            query: &str,
            history: &[ChatMessage],
        ) -> Result<String, ChatbotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some((query.to_string(), history.len()));
            self.reply
                .map(str::to_string)
                .map_err(|m| ChatbotError::UpstreamUnavailable(m.to_string()))
        }
    }

    #[test]
    fn prompt_lists_all_graded_labels_and_quotes_text() {
        let prompt = sentiment_prompt("Picnic on Saturday");
        for graded in GradedSentiment::ALL {
            assert!(prompt.contains(graded.label()), "missing {}", graded.label());
        }
        assert!(prompt.contains("Text: \"Picnic on Saturday\""));
        assert!(prompt.contains("Score (0-100"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_calling_model() {
        let chat = ScriptedChat::replying("Sentiment: positive");
        for text in ["", "   \n"] {
            let err = analyze_sentiment(&chat, text).await.unwrap_err();
            assert!(matches!(err, ChatbotError::InvalidInput(_)), "got {err:?}");
        }
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sends_prompt_with_empty_history_and_parses_reply() {
        let chat = ScriptedChat::replying("Sentiment: negative\nScore: 90\nReason: Poor performance.");
        let result = analyze_sentiment(&chat, "Quarterly results were weak")
            .await
            .expect("analysis");

        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!((result.score - 0.2).abs() < 1e-9);
        assert_eq!(result.analysis, "Poor performance");

        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
        let (query, history_len) = chat.last_query.lock().unwrap().clone().expect("query");
        assert!(query.contains("Quarterly results were weak"));
        assert_eq!(history_len, 0);
    }

    #[tokio::test]
    async fn collaborator_failure_becomes_extraction_failed() {
        let chat = ScriptedChat::failing("connection refused");
        let err = analyze_sentiment(&chat, "Hello").await.unwrap_err();
        assert!(
            matches!(err, ChatbotError::ExtractionFailed(ref m) if m.contains("connection refused")),
            "got {err:?}"
        );
        assert!(!err.is_client_error());
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }
}
