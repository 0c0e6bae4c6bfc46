//! Sentiment collaborators.
//!
//! The engine consumes a single confidence score in `[0, 1]`; where the score
//! comes from is the composition root's choice. `LexiconOracle` is a fast
//! keyword heuristic that lets the binary run without a model server; a
//! model-backed scorer plugs in through the same trait.

use serde::{Deserialize, Serialize};

/// Score returned by a sentiment collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentimentScore {
    pub score: f32,
}

/// Black-box sentiment scorer injected into the engine.
pub trait SentimentOracle: Send + Sync {
    fn classify(&self, text: &str) -> SentimentScore;
}

/// Urgency-laden vocabulary typical of scam and promo copy.
const CHARGED_TERMS: &[&str] = &[
    "urgente",
    "agora",
    "imediatamente",
    "última chance",
    "ultima chance",
    "não perca",
    "nao perca",
    "bloqueado",
    "bloqueada",
    "suspensa",
    "exclusivo",
    "grátis",
    "gratis",
    "parabéns",
    "parabens",
];

/// Conversational vocabulary that reads as ordinary chat.
const CALM_TERMS: &[&str] = &[
    "bom dia",
    "boa tarde",
    "boa noite",
    "obrigado",
    "obrigada",
    "abraço",
    "abraco",
    "até logo",
    "ate logo",
];

/// Keyword-table heuristic: emphatic, urgency-laden text scores high,
/// conversational text scores low, everything else sits mid-range.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconOracle;

impl SentimentOracle for LexiconOracle {
    fn classify(&self, text: &str) -> SentimentScore {
        let hay = text.to_lowercase();
        let charged = CHARGED_TERMS.iter().filter(|t| hay.contains(*t)).count();
        let calm = CALM_TERMS.iter().filter(|t| hay.contains(*t)).count();
        let exclaims = text.matches('!').count().min(5);
        let raw = 0.5 + 0.1 * charged as f32 + 0.04 * exclaims as f32 - 0.1 * calm as f32;
        SentimentScore {
            score: raw.clamp(0.0, 1.0),
        }
    }
}

/// Returns the same score for every input. Test collaborator.
#[derive(Debug, Clone, Copy)]
pub struct FixedOracle(pub f32);

impl SentimentOracle for FixedOracle {
    fn classify(&self, _text: &str) -> SentimentScore {
        SentimentScore {
            score: self.0.clamp(0.0, 1.0),
        }
    }
}
