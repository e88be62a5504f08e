use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use noticeboard_chatbot::{ChatCompletion, ChatMessage, ChatbotError, SentimentResult};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Sent in place of a model reply when the model server cannot be reached.
pub(super) const FALLBACK_MESSAGE: &str =
    "I'm sorry, I'm having trouble connecting to my AI backend right now. Please try again later.";

#[derive(Debug, Deserialize)]
pub(super) struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SummaryResponse {
    pub summary: String,
}

fn required_text<'a>(text: Option<&'a str>, message: &'static str) -> Result<&'a str, ApiError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}

pub(super) async fn chat(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let query = required_text(request.query.as_deref(), "Query is required")?;

    match state.chatbot.complete(query, &request.history).await {
        Ok(message) => Ok(Json(ChatResponse { message })),
        Err(ChatbotError::UpstreamUnavailable(reason)) => {
            tracing::warn!(
                request_id = %req_id.0,
                %reason,
                "model unavailable; sending fallback reply"
            );
            Ok(Json(ChatResponse {
                message: FALLBACK_MESSAGE.to_string(),
            }))
        }
        Err(ChatbotError::InvalidInput(message)) => Err(ApiError::bad_request(message)),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "chatbot request failed");
            Err(ApiError::internal("An error occurred with the chatbot service"))
        }
    }
}

pub(super) async fn sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SentimentResult>, ApiError> {
    let Json(request) = payload?;
    let text = required_text(request.text.as_deref(), "Text is required")?;

    noticeboard_chatbot::analyze_sentiment(state.chatbot.as_ref(), text)
        .await
        .map(Json)
        .map_err(|e| {
            if e.is_client_error() {
                return ApiError::bad_request("Text is required");
            }
            tracing::error!(request_id = %req_id.0, error = %e, "error in sentiment analysis");
            ApiError::internal("Failed to analyze sentiment")
        })
}

pub(super) async fn summarize(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(request) = payload?;
    let text = required_text(request.text.as_deref(), "Text is required")?;

    noticeboard_chatbot::summarize(state.chatbot.as_ref(), text)
        .await
        .map(|summary| Json(SummaryResponse { summary }))
        .map_err(|e| {
            if e.is_client_error() {
                return ApiError::bad_request("Text is required");
            }
            tracing::error!(request_id = %req_id.0, error = %e, "error in summarization");
            ApiError::internal("Failed to generate summary")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_borrows_from_the_request() {
        let body = String::from("Lot B closes Monday");
        let text = required_text(Some(body.as_str()), "Text is required").expect("text");
        assert_eq!(text, "Lot B closes Monday");
    }

    #[test]
    fn required_text_rejects_blank_and_missing() {
        for input in [None, Some(""), Some("   ")] {
            let err = required_text(input, "Text is required").unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Text is required");
        }
    }
}
