//! Plain renderings of an analysis result for the terminal boundary.

use crate::core::error::LensError;
use crate::core::types::{AnalysisOutcome, Category};

/// Prompt shown when the input had no content.
pub const EMPTY_INPUT_PROMPT: &str = "please provide a message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
    Markdown,
}

pub fn render(outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String, LensError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(outcome).map_err(|e| LensError::Render(e.to_string()))
        }
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Markdown => Ok(render_markdown(outcome)),
    }
}

fn headline(category: Category) -> &'static str {
    match category {
        Category::Scam => "HIGH PROBABILITY OF A SCAM",
        Category::Suspicious => "suspicious message, be careful",
        Category::Marketing => "looks like promotional content",
        Category::Safe => "looks safe",
    }
}

fn risk_bar(risk: u8) -> String {
    let filled = usize::from(risk.min(10));
    format!("[{}{}] {}/10", "#".repeat(filled), "-".repeat(10 - filled), risk)
}

fn render_text(outcome: &AnalysisOutcome) -> String {
    let AnalysisOutcome::Report(report) = outcome else {
        return format!("{EMPTY_INPUT_PROMPT}\n");
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", headline(report.verdict.category)));
    out.push_str(&format!("risk {}\n", risk_bar(report.verdict.risk_level)));
    for alert in &report.verdict.alerts {
        out.push_str(&format!("- {alert}\n"));
    }
    for preview in &report.previews {
        out.push('\n');
        if preview.safe {
            out.push_str("link preview (do not click unless you trust the sender):\n");
        } else {
            out.push_str("link blocked:\n");
        }
        out.push_str(&format!(
            "  address: {}\n  title: {}\n",
            preview.final_url, preview.title
        ));
        if let Some(img) = &preview.preview_image_url {
            out.push_str(&format!("  image: {img}\n"));
        }
    }
    out
}

fn render_markdown(outcome: &AnalysisOutcome) -> String {
    let AnalysisOutcome::Report(report) = outcome else {
        return format!("_{EMPTY_INPUT_PROMPT}_\n");
    };

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", headline(report.verdict.category)));
    out.push_str(&format!("Generated: {}\n\n", report.analyzed_at.to_rfc3339()));
    out.push_str(&format!(
        "- Risk: {}/10\n- Model confidence: {:.2}\n\n",
        report.verdict.risk_level, report.verdict.model_confidence
    ));
    out.push_str("## Alerts\n\n");
    for alert in &report.verdict.alerts {
        out.push_str(&format!("- {alert}\n"));
    }
    if !report.previews.is_empty() {
        out.push_str("\n## Links\n\n");
        for preview in &report.previews {
            out.push_str(&format!(
                "- {} — {} ({})\n",
                preview.final_url,
                preview.title,
                if preview.safe { "fetched" } else { "blocked" }
            ));
        }
    }
    out
}
