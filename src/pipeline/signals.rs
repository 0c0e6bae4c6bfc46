//! Weak-signal extraction from raw message text.
//!
//! Everything here is pure and total: any string in, one `SignalSet` out.
//! Keyword checks run against a lower-cased copy of the message; URL capture
//! and caps counting look at the original text.

use regex::Regex;
use serde::Serialize;

/// Domains known to issue opaque redirecting short URLs.
const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "tinyurl",
    "cut.ly",
    "is.gd",
    "t.co",
    "goo.gl",
    "ow.ly",
    "rb.gy",
    "encurtador.com.br",
];

/// Imperatives that push the reader toward a link or a form.
const ACTION_TERMS: &[&str] = &[
    "clique",
    "acesse",
    "confirme",
    "atualize",
    "valide",
    "cadastre",
    "resgate",
    "baixe",
    "instale",
];

/// Credential and payment-data vocabulary.
const SENSITIVE_TERMS: &[&str] = &[
    "senha",
    "cartão",
    "cartao",
    "cvv",
    "código de segurança",
    "codigo de seguranca",
    "dados bancários",
    "dados bancarios",
    "conta bancária",
    "conta bancaria",
    "dados pessoais",
];

/// Instant-payment and prize bait.
const PRIZE_TERMS: &[&str] = &[
    "pix",
    "prêmio",
    "premio",
    "ganhou",
    "sorteio",
    "sorteado",
    "contemplado",
];

/// Easy-money vocabulary.
const MONEY_TERMS: &[&str] = &[
    "r$",
    "ganhe",
    "ganhou",
    "receba",
    "transferido",
    "saldo",
    "prêmio",
    "premio",
    "renda extra",
    "dinheiro fácil",
    "dinheiro facil",
];

/// Commercial trigger words typical of legitimate promotional copy.
const MARKETING_CUES: &[&str] = &[
    "desconto",
    "cupom",
    "promoção",
    "promocao",
    "oferta",
    "frete grátis",
    "frete gratis",
    "liquidação",
    "liquidacao",
    "estoque limitado",
    "só hoje",
    "so hoje",
    "imperdível",
    "imperdivel",
    "aproveite",
    "black friday",
];

/// Flags and counts derived from one message. Built once per analysis call,
/// read-only afterward.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SignalSet {
    /// Candidate URLs exactly as they appear in the text, in order.
    pub links: Vec<String>,
    pub uses_shortener: bool,
    pub has_action_term: bool,
    pub has_sensitive_term: bool,
    pub has_gambling_term: bool,
    pub has_prize_bait: bool,
    pub has_money_promise: bool,
    pub marketing_cue_count: usize,
    pub has_price_pattern: bool,
    pub mentions_cpf: bool,
    pub caps_word_count: usize,
    pub exclamation_count: usize,
}

impl SignalSet {
    pub fn has_link(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Compiled patterns for signal extraction. Build once, reuse per message.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    url_re: Regex,
    gambling_re: Regex,
    price_re: Regex,
    cpf_re: Regex,
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalExtractor {
    pub fn new() -> Self {
        Self {
            url_re: Regex::new(r"https?://\S+").expect("url pattern is valid"),
            // Word-boundary match so a name like "Roberta" never counts as "bet".
            gambling_re: Regex::new(
                r"\b(?:cassino|cassinos|aposta|apostas|apostar|bet|bets|bet365|betano|sportingbet|blaze|tigrinho|roleta|jackpot)\b",
            )
            .expect("gambling pattern is valid"),
            price_re: Regex::new(r"\d+(?:[.,]\d+)?\s*%|r\$\s*\d").expect("price pattern is valid"),
            cpf_re: Regex::new(r"\bcpf\b|\b\d{3}\.\d{3}\.\d{3}-\d{2}\b")
                .expect("cpf pattern is valid"),
        }
    }

    pub fn extract(&self, message: &str) -> SignalSet {
        let hay = message.to_lowercase();
        let links: Vec<String> = self
            .url_re
            .find_iter(message)
            .map(|m| m.as_str().to_string())
            .collect();

        SignalSet {
            uses_shortener: contains_any(&hay, SHORTENER_DOMAINS),
            has_action_term: contains_any(&hay, ACTION_TERMS),
            has_sensitive_term: contains_any(&hay, SENSITIVE_TERMS),
            has_gambling_term: self.gambling_re.is_match(&hay),
            has_prize_bait: contains_any(&hay, PRIZE_TERMS),
            has_money_promise: contains_any(&hay, MONEY_TERMS),
            marketing_cue_count: MARKETING_CUES.iter().filter(|cue| hay.contains(*cue)).count(),
            has_price_pattern: self.price_re.is_match(&hay),
            mentions_cpf: self.cpf_re.is_match(&hay),
            caps_word_count: count_caps_words(message),
            exclamation_count: message.matches('!').count(),
            links,
        }
    }
}

fn contains_any(hay: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| hay.contains(*t))
}

/// Count of shouted words: four or more letters, all upper-case.
fn count_caps_words(text: &str) -> usize {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| {
            w.chars().count() >= 4 && w.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
        })
        .count()
}
