use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::LensError;

/// Points granted by each scoring rule. Rules only ever add; deployments tune
/// the values without recompiling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub link_present: u32,
    pub shortened_link: u32,
    pub link_with_action: u32,
    pub sensitive_terms: u32,
    pub prize_bait: u32,
    pub gambling: u32,
    pub money_promise: u32,
    pub marketing_cue: u32,
    pub price_pattern: u32,
    pub cpf_mention: u32,
    pub caps_shouting: u32,
    pub exclamations: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            link_present: 1,
            shortened_link: 2,
            link_with_action: 2,
            sensitive_terms: 2,
            prize_bait: 2,
            gambling: 2,
            money_promise: 2,
            marketing_cue: 2,
            price_pattern: 2,
            cpf_mention: 1,
            caps_shouting: 1,
            exclamations: 1,
        }
    }
}

/// Cut-offs for the verdict policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    /// Phishing points at which a message is called a scam outright.
    pub scam_min_phishing: u32,
    /// Marketing points needed for a promo verdict (phishing must be zero).
    pub marketing_min: u32,
    /// Soft-risk points that alone make a message suspicious.
    pub suspicious_min_soft: u32,
    /// Upper bound of the reported risk level.
    pub risk_cap: u8,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            scam_min_phishing: 3,
            marketing_min: 2,
            suspicious_min_soft: 3,
            risk_cap: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timeout_ms: u64,
    pub max_concurrent_fetches: usize,
    /// Hard cap on bytes read from any response body.
    pub fetch_byte_cap: usize,
    pub max_redirect_hops: usize,
    pub user_agent: String,
    /// Fetch previews at all. The CLI turns this off for offline runs.
    pub fetch_links: bool,
    /// Permit fetches that resolve to private or loopback ranges. Only for
    /// test rigs pointed at local mock servers.
    pub allow_private_networks: bool,
    pub weights: ScoreWeights,
    pub thresholds: VerdictThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 6_000,
            max_concurrent_fetches: 4,
            fetch_byte_cap: 500_000,
            max_redirect_hops: 4,
            user_agent: "scamlens/1.0".to_string(),
            fetch_links: true,
            allow_private_networks: false,
            weights: ScoreWeights::default(),
            thresholds: VerdictThresholds::default(),
        }
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, LensError> {
    let default_path = Path::new("config/scamlens.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| LensError::Config(e.to_string()))?;
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| LensError::Config(e.to_string()))?;
    Ok(cfg)
}
