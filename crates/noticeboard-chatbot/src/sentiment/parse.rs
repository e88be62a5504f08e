//! Scraping a structured sentiment out of a free-text model reply.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Reason reported when the reply carries none.
pub const DEFAULT_ANALYSIS: &str = "No specific reason provided.";

/// Score used when nothing in the reply says otherwise.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Negative results above this are forced down to [`NEGATIVE_FLOOR_SCORE`].
const NEGATIVE_MAX_SCORE: f64 = 0.4;
const NEGATIVE_FLOOR_SCORE: f64 = 0.2;
/// Positive results below this are forced up to [`POSITIVE_CEIL_SCORE`].
const POSITIVE_MIN_SCORE: f64 = 0.6;
const POSITIVE_CEIL_SCORE: f64 = 0.8;

// Markdown emphasis around labels ("**Sentiment:** Positive") is common in
// model output, so `*` and `_` are skipped along with whitespace.
static SENTIMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)sentiment[*_]*:[\s*_]*(very positive|positive|slightly positive|neutral|slightly negative|negative|very negative)",
    )
    .expect("valid sentiment regex")
});

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score[*_]*:[\s*_]*(\d+)").expect("valid score regex"));

static REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)reason[*_]*:[\s*_]*([^.!?\n]+)").expect("valid reason regex")
});

/// Three-way sentiment shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// The seven labels the model is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradedSentiment {
    VeryPositive,
    Positive,
    SlightlyPositive,
    Neutral,
    SlightlyNegative,
    Negative,
    VeryNegative,
}

impl GradedSentiment {
    pub const ALL: [GradedSentiment; 7] = [
        GradedSentiment::VeryPositive,
        GradedSentiment::Positive,
        GradedSentiment::SlightlyPositive,
        GradedSentiment::Neutral,
        GradedSentiment::SlightlyNegative,
        GradedSentiment::Negative,
        GradedSentiment::VeryNegative,
    ];

    /// Parses a label case-insensitively, e.g. `"Slightly Negative"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|g| g.label() == label)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GradedSentiment::VeryPositive => "very positive",
            GradedSentiment::Positive => "positive",
            GradedSentiment::SlightlyPositive => "slightly positive",
            GradedSentiment::Neutral => "neutral",
            GradedSentiment::SlightlyNegative => "slightly negative",
            GradedSentiment::Negative => "negative",
            GradedSentiment::VeryNegative => "very negative",
        }
    }

    /// Canonical score used when the reply gives no numeric score.
    #[must_use]
    pub fn canonical_score(self) -> f64 {
        match self {
            GradedSentiment::VeryPositive => 0.95,
            GradedSentiment::Positive => 0.80,
            GradedSentiment::SlightlyPositive => 0.65,
            GradedSentiment::Neutral => 0.50,
            GradedSentiment::SlightlyNegative => 0.35,
            GradedSentiment::Negative => 0.20,
            GradedSentiment::VeryNegative => 0.05,
        }
    }

    #[must_use]
    pub fn bucket(self) -> Sentiment {
        match self {
            GradedSentiment::VeryPositive
            | GradedSentiment::Positive
            | GradedSentiment::SlightlyPositive => Sentiment::Positive,
            GradedSentiment::SlightlyNegative
            | GradedSentiment::Negative
            | GradedSentiment::VeryNegative => Sentiment::Negative,
            GradedSentiment::Neutral => Sentiment::Neutral,
        }
    }
}

/// Structured outcome of one sentiment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// In `[0.0, 1.0]`, consistent with `sentiment`.
    pub score: f64,
    pub analysis: String,
}

/// Parse a model reply into a [`SentimentResult`].
///
/// Never fails: a reply with no recognizable label, score or reason resolves
/// to Neutral, `0.5` and [`DEFAULT_ANALYSIS`].
#[must_use]
pub fn parse_sentiment_reply(reply: &str) -> SentimentResult {
    let graded = SENTIMENT_RE
        .captures(reply)
        .and_then(|c| GradedSentiment::from_label(&c[1]));

    let sentiment = graded.map_or(Sentiment::Neutral, GradedSentiment::bucket);
    let mut score = graded.map_or(NEUTRAL_SCORE, GradedSentiment::canonical_score);

    if let Some(raw) = extract_raw_score(reply) {
        score = f64::from(raw) / 100.0;
    }

    let analysis = REASON_RE
        .captures(reply)
        .map(|c| c[1].trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| DEFAULT_ANALYSIS.to_string());

    SentimentResult {
        sentiment,
        score: reconcile_score(sentiment, score),
        analysis,
    }
}

/// The 0-100 score, capped at 100. Digit runs too long for a `u32` are ignored.
fn extract_raw_score(reply: &str) -> Option<u32> {
    let caps = SCORE_RE.captures(reply)?;
    caps[1].parse::<u32>().ok().map(|raw| raw.min(100))
}

/// Forces the score into the band implied by the bucket label.
fn reconcile_score(sentiment: Sentiment, score: f64) -> f64 {
    match sentiment {
        Sentiment::Negative if score > NEGATIVE_MAX_SCORE => NEGATIVE_FLOOR_SCORE,
        Sentiment::Positive if score < POSITIVE_MIN_SCORE => POSITIVE_CEIL_SCORE,
        _ => score,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
