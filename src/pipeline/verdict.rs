//! Decision policy over the risk accumulators.

use crate::config::VerdictThresholds;
use crate::core::types::{Category, Verdict};
use crate::pipeline::scorer::RuleOutcome;

/// First match wins; the priority order keeps a message from landing in two
/// categories at once.
pub fn classify(
    outcome: RuleOutcome,
    model_confidence: f32,
    thresholds: &VerdictThresholds,
) -> Verdict {
    let RuleOutcome {
        scores,
        mut alerts,
        marketing_alerts,
    } = outcome;

    let category = if scores.phishing >= thresholds.scam_min_phishing {
        Category::Scam
    } else if scores.marketing >= thresholds.marketing_min && scores.phishing == 0 {
        alerts.extend(marketing_alerts);
        Category::Marketing
    } else if scores.phishing > 0 || scores.soft_risk >= thresholds.suspicious_min_soft {
        Category::Suspicious
    } else {
        Category::Safe
    };

    let risk_level = (scores.phishing + scores.soft_risk).min(u32::from(thresholds.risk_cap)) as u8;

    if alerts.is_empty() {
        alerts.push(format!("model confidence: {model_confidence:.2}"));
    }

    Verdict {
        category,
        risk_level,
        alerts,
        model_confidence,
    }
}
