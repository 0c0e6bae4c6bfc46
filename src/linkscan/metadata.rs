//! Metadata extraction from fetched pages.
//!
//! Total on both sides: a rejected fetch becomes the fallback preview, and a
//! broken payload degrades field by field instead of failing.

use encoding_rs::Encoding;
use scraper::{Html, Selector};
use unicode_normalization::UnicodeNormalization;

use crate::core::types::LinkPreview;
use crate::linkscan::resolver::FetchOutcome;

/// Title reported when a page has none.
const NO_TITLE: &str = "no title";

/// Longest title carried into a preview.
const TITLE_MAX_CHARS: usize = 160;

/// Turn a fetch outcome into a preview.
pub fn extract_metadata(outcome: &FetchOutcome) -> LinkPreview {
    match outcome {
        FetchOutcome::Rejected { url, .. } => LinkPreview::unreachable(url.clone()),
        FetchOutcome::Fetched {
            final_url,
            body,
            charset,
        } => {
            let html = decode_body(body, charset.as_deref());
            let doc = Html::parse_document(&html);

            let title = meta_content(&doc, "meta[property=\"og:title\"]")
                .or_else(|| meta_content(&doc, "meta[name=\"title\"]"))
                .or_else(|| element_text(&doc, "title"))
                .map(|t| sanitize_title(&t))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NO_TITLE.to_string());

            let preview_image_url = meta_content(&doc, "meta[property=\"og:image\"]")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());

            LinkPreview {
                final_url: final_url.clone(),
                title,
                preview_image_url,
                safe: true,
            }
        }
    }
}

/// Decode with the declared charset when it is recognized, otherwise fall
/// back to lossy UTF-8.
fn decode_body(body: &[u8], charset: Option<&str>) -> String {
    if let Some(label) = charset {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(body);
            return text.into_owned();
        }
    }
    String::from_utf8_lossy(body).into_owned()
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .find_map(|el| el.value().attr("content").map(|v| v.to_string()))
}

fn element_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Unescape, normalize and bound a page title. Re-running the function on its
/// own output changes nothing.
pub fn sanitize_title(raw: &str) -> String {
    let mut text = raw.to_string();
    // Unescape to a fixpoint so double-encoded entities cannot survive.
    for _ in 0..4 {
        let decoded = html_escape::decode_html_entities(&text);
        if decoded.as_ref() == text.as_str() {
            break;
        }
        text = decoded.into_owned();
    }
    let normalized: String = text.nfkc().collect();
    let printable: String = normalized.chars().filter(|c| !c.is_control()).collect();
    let collapsed = printable.split_whitespace().collect::<Vec<_>>().join(" ");
    let bounded: String = collapsed.chars().take(TITLE_MAX_CHARS).collect();
    bounded.trim().to_string()
}
