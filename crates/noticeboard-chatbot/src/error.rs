use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("model upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("sentiment extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("summary generation failed: {0}")]
    SummaryFailed(String),

    #[error("portal context unavailable: {0}")]
    Context(#[from] noticeboard_core::ConfigError),

    #[error("internal chatbot error: {0}")]
    Internal(String),
}

impl ChatbotError {
    /// True for errors caused by the caller rather than the service.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
