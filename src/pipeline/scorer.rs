//! Fixed rule table turning a signal set into risk accumulators.

use serde::Serialize;

use crate::config::ScoreWeights;
use crate::pipeline::signals::SignalSet;

/// Non-negative accumulators; rules only ever add.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ScoreBoard {
    pub phishing: u32,
    pub soft_risk: u32,
    pub marketing: u32,
}

/// Scores plus the alert trail, in rule-evaluation order. Marketing alerts
/// are kept apart so the classifier can attach them only to promo verdicts.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RuleOutcome {
    pub scores: ScoreBoard,
    pub alerts: Vec<String>,
    pub marketing_alerts: Vec<String>,
}

/// Apply the rule table. Deterministic; every triggered rule adds its points
/// and one alert line.
pub fn score_signals(signals: &SignalSet, weights: &ScoreWeights) -> RuleOutcome {
    let mut out = RuleOutcome::default();

    if signals.has_link() {
        out.scores.soft_risk += weights.link_present;
        out.alerts.push("message contains a link".to_string());
    }
    if signals.uses_shortener {
        out.scores.phishing += weights.shortened_link;
        out.alerts
            .push("link goes through a URL shortener, common in phishing".to_string());
    }
    if signals.has_link() && signals.has_action_term {
        out.scores.phishing += weights.link_with_action;
        out.alerts.push("link paired with a call to action".to_string());
    }
    if signals.has_sensitive_term {
        out.scores.phishing += weights.sensitive_terms;
        out.alerts
            .push("mentions passwords, cards or other sensitive data".to_string());
    }
    if signals.has_prize_bait {
        out.scores.soft_risk += weights.prize_bait;
        out.alerts.push("mentions pix transfers or prizes".to_string());
    }
    if signals.has_gambling_term {
        out.scores.soft_risk += weights.gambling;
        out.alerts.push("mentions casinos or online betting".to_string());
    }
    if signals.has_money_promise && signals.has_link() && signals.has_action_term {
        out.scores.phishing += weights.money_promise;
        out.alerts.push("promises easy money behind a link".to_string());
    }

    if signals.marketing_cue_count > 0 {
        out.scores.marketing += weights.marketing_cue;
        out.marketing_alerts
            .push("commercial trigger words detected".to_string());
    }
    if signals.has_price_pattern {
        out.scores.marketing += weights.price_pattern;
        out.marketing_alerts
            .push("discount percentage or price tag mentioned".to_string());
    }
    if signals.mentions_cpf {
        out.scores.marketing += weights.cpf_mention;
        out.marketing_alerts.push("asks for a CPF number".to_string());
    }
    if signals.caps_word_count >= 2 {
        out.scores.marketing += weights.caps_shouting;
        out.marketing_alerts.push("shouting in all caps".to_string());
    }
    if signals.exclamation_count >= 2 {
        out.scores.marketing += weights.exclamations;
        out.marketing_alerts
            .push("repeated exclamation marks".to_string());
    }

    out
}
