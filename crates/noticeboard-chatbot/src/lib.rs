//! Chatbot proxy for the noticeboard portal.
//!
//! Forwards natural-language queries, together with a JSON dump of the portal
//! snapshot, to a locally hosted Ollama model. Sentiment analysis and
//! summarization are built on the same chat collaborator: sentiment prompts the
//! model for a graded label, score and reason, then scrapes the free-text reply
//! into a [`SentimentResult`].

pub mod chat;
pub mod error;
pub mod ollama;
pub mod sentiment;
pub mod summarize;
pub mod types;

mod prompt;

pub use chat::{ChatCompletion, Chatbot, ContextSource};
pub use error::ChatbotError;
pub use ollama::{OllamaClient, OllamaConfig};
pub use sentiment::{
    analyze_sentiment, parse_sentiment_reply, GradedSentiment, Sentiment, SentimentResult,
};
pub use summarize::summarize;
pub use types::{ChatMessage, ChatRole};
