use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a link cannot be fetched safely.
pub const FALLBACK_TITLE: &str = "link inaccessible or unsafe";

/// Final category for one analyzed message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Scam,
    Suspicious,
    Marketing,
    Safe,
}

/// Classification result for a single message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub category: Category,
    /// Phishing plus soft-risk points, capped at 10.
    pub risk_level: u8,
    /// Human-readable findings, in detection order.
    pub alerts: Vec<String>,
    pub model_confidence: f32,
}

/// Safe preview of one URL found in the message. Always produced; an
/// unreachable or disallowed link yields `safe = false` and a fallback title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkPreview {
    pub final_url: String,
    pub title: String,
    pub preview_image_url: Option<String>,
    pub safe: bool,
}

impl LinkPreview {
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            final_url: url.into(),
            title: FALLBACK_TITLE.to_string(),
            preview_image_url: None,
            safe: false,
        }
    }
}

/// Everything one analysis call produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub verdict: Verdict,
    pub previews: Vec<LinkPreview>,
    pub analyzed_at: DateTime<Utc>,
}

/// Total result of an analysis call; empty input is a sentinel, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    EmptyInput,
    Report(AnalysisReport),
}
