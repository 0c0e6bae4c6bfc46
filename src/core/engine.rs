use std::sync::Arc;

use chrono::Utc;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::warn;

use crate::{
    config::AppConfig,
    core::{
        error::LensError,
        sentiment::SentimentOracle,
        types::{AnalysisOutcome, AnalysisReport, LinkPreview},
    },
    linkscan::{metadata::extract_metadata, resolver::LinkResolver},
    pipeline::{scorer::score_signals, signals::SignalExtractor, verdict::classify},
};

/// Analysis engine. One long-lived instance serves any number of independent
/// `analyze` calls; nothing is kept between them.
pub struct Engine {
    resolver: LinkResolver,
    extractor: SignalExtractor,
    oracle: Arc<dyn SentimentOracle>,
    semaphore: Arc<Semaphore>,
    pub config: AppConfig,
}

impl Engine {
    pub fn new(config: AppConfig, oracle: Arc<dyn SentimentOracle>) -> Result<Self, LensError> {
        let resolver = LinkResolver::new(&config)?;
        Ok(Self {
            resolver,
            extractor: SignalExtractor::new(),
            oracle,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
            config,
        })
    }

    /// Analyze one message: classify it and build a safe preview for every
    /// URL it carries. Whitespace-only input short-circuits with a sentinel
    /// and triggers no network activity.
    pub async fn analyze(&self, message: &str) -> AnalysisOutcome {
        if message.trim().is_empty() {
            return AnalysisOutcome::EmptyInput;
        }

        let confidence = self.oracle.classify(message).score;
        let signals = self.extractor.extract(message);
        let outcome = score_signals(&signals, &self.config.weights);
        let verdict = classify(outcome, confidence, &self.config.thresholds);
        let previews = self.preview_links(&signals.links).await;

        AnalysisOutcome::Report(AnalysisReport {
            verdict,
            previews,
            analyzed_at: Utc::now(),
        })
    }

    /// One preview per candidate URL, fetched concurrently under the
    /// connection bound, results in input order. A lost task degrades to the
    /// unreachable preview instead of dropping its slot.
    async fn preview_links(&self, links: &[String]) -> Vec<LinkPreview> {
        if !self.config.fetch_links || links.is_empty() {
            return Vec::new();
        }

        let mut set = JoinSet::new();
        for (idx, link) in links.iter().enumerate() {
            let resolver = self.resolver.clone();
            let semaphore = self.semaphore.clone();
            let link = link.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = resolver.resolve(&link).await;
                (idx, extract_metadata(&outcome))
            });
        }

        let mut slots: Vec<Option<LinkPreview>> = vec![None; links.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, preview)) => slots[idx] = Some(preview),
                Err(err) => warn!("preview task lost: {err}"),
            }
        }

        slots
            .into_iter()
            .zip(links)
            .map(|(slot, link)| slot.unwrap_or_else(|| LinkPreview::unreachable(link.clone())))
            .collect()
    }
}
