use std::sync::Arc;

use httpmock::prelude::*;
use scamlens::{
    config::AppConfig,
    core::{
        engine::Engine,
        sentiment::FixedOracle,
        types::{AnalysisOutcome, AnalysisReport, Category, FALLBACK_TITLE},
    },
};

fn test_config(allow_private: bool) -> AppConfig {
    AppConfig {
        timeout_ms: 2_000,
        allow_private_networks: allow_private,
        ..AppConfig::default()
    }
}

fn engine(allow_private: bool) -> Engine {
    Engine::new(test_config(allow_private), Arc::new(FixedOracle(0.9))).unwrap()
}

fn report(outcome: AnalysisOutcome) -> AnalysisReport {
    match outcome {
        AnalysisOutcome::Report(report) => report,
        AnalysisOutcome::EmptyInput => panic!("expected a report"),
    }
}

#[tokio::test]
async fn blank_input_yields_the_sentinel() {
    let outcome = engine(false).analyze("   \n\t").await;
    assert!(matches!(outcome, AnalysisOutcome::EmptyInput));
}

#[tokio::test]
async fn benign_chat_is_safe_with_a_confidence_alert() {
    let report = report(engine(false).analyze("Bom dia, como você está?").await);
    assert_eq!(report.verdict.category, Category::Safe);
    assert_eq!(report.verdict.risk_level, 0);
    assert_eq!(
        report.verdict.alerts,
        vec!["model confidence: 0.90".to_string()]
    );
    assert!(report.previews.is_empty());
}

#[tokio::test]
async fn promo_copy_classifies_as_marketing() {
    let report = report(engine(false).analyze("Cupom de 20% de desconto só hoje!!").await);
    assert_eq!(report.verdict.category, Category::Marketing);
    assert!(report.previews.is_empty());
}

#[tokio::test]
async fn prize_bait_with_a_shortener_is_a_scam() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/xyz");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><head><title>Premiado</title></head></html>");
    });

    let msg = format!(
        "Você ganhou um prêmio via bit.ly! Clique aqui: {}/xyz",
        server.base_url()
    );
    let report = report(engine(true).analyze(&msg).await);

    assert_eq!(report.verdict.category, Category::Scam);
    assert_eq!(report.verdict.risk_level, 9);
    assert_eq!(report.previews.len(), 1);
    assert!(report.previews[0].safe);
    assert_eq!(report.previews[0].title, "Premiado");
}

#[tokio::test]
async fn preview_extracts_page_metadata() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/promo");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(concat!(
                "<html><head>",
                "<meta property=\"og:title\" content=\"Mega Loja\"/>",
                "<meta property=\"og:image\" content=\"https://cdn.example/banner.png\"/>",
                "<title>ignored</title>",
                "</head><body>oi</body></html>"
            ));
    });

    let msg = format!("Confira: {}/promo", server.base_url());
    let report = report(engine(true).analyze(&msg).await);

    page.assert();
    assert_eq!(report.previews.len(), 1);
    let preview = &report.previews[0];
    assert!(preview.safe);
    assert_eq!(preview.title, "Mega Loja");
    assert_eq!(
        preview.preview_image_url.as_deref(),
        Some("https://cdn.example/banner.png")
    );
}

#[tokio::test]
async fn loopback_targets_are_rejected_without_a_request() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/secret");
        then.status(200).body("internal");
    });

    let msg = format!("olha isso {}/secret", server.base_url());
    let report = report(engine(false).analyze(&msg).await);

    assert_eq!(report.previews.len(), 1);
    let preview = &report.previews[0];
    assert!(!preview.safe);
    assert_eq!(preview.title, FALLBACK_TITLE);
    page.assert_hits(0);
}

#[tokio::test]
async fn redirects_are_followed_and_revalidated() {
    let server = MockServer::start();
    let hop = server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(302).header("location", "/b");
    });
    let landing = server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><head><title>Landed</title></head></html>");
    });

    let msg = format!("{}/a", server.base_url());
    let report = report(engine(true).analyze(&msg).await);

    hop.assert();
    landing.assert();
    let preview = &report.previews[0];
    assert!(preview.safe);
    assert_eq!(preview.title, "Landed");
    assert!(preview.final_url.ends_with("/b"));
}

#[tokio::test]
async fn redirect_to_a_disallowed_scheme_is_rejected() {
    let server = MockServer::start();
    let hop = server.mock(|when, then| {
        when.method(GET).path("/ftp");
        then.status(302)
            .header("location", "ftp://files.example.com/x");
    });

    let msg = format!("{}/ftp", server.base_url());
    let report = report(engine(true).analyze(&msg).await);

    hop.assert();
    assert!(!report.previews[0].safe);
    assert_eq!(report.previews[0].title, FALLBACK_TITLE);
}

#[tokio::test]
async fn endless_redirects_give_up_safely() {
    let server = MockServer::start();
    let looping = server.mock(|when, then| {
        when.method(GET).path("/loop");
        then.status(302).header("location", "/loop");
    });

    let msg = format!("{}/loop", server.base_url());
    let report = report(engine(true).analyze(&msg).await);

    assert!(looping.hits() >= 1);
    assert!(!report.previews[0].safe);
}

#[tokio::test]
async fn oversized_bodies_are_truncated_at_the_cap() {
    let server = MockServer::start();
    let filler = "x".repeat(50_000);
    let big = format!(
        "<html><head><title>Big Page</title></head><body>{filler}</body></html>"
    );
    server.mock(|when, then| {
        when.method(GET).path("/big");
        then.status(200)
            .header("content-type", "text/html")
            .body(big.as_str());
    });

    let mut cfg = test_config(true);
    cfg.fetch_byte_cap = 600;
    let engine = Engine::new(cfg, Arc::new(FixedOracle(0.5))).unwrap();

    let msg = format!("{}/big", server.base_url());
    let report = report(engine.analyze(&msg).await);

    // The title sits inside the cap, so extraction still succeeds on the
    // truncated payload.
    let preview = &report.previews[0];
    assert!(preview.safe);
    assert_eq!(preview.title, "Big Page");
}

#[tokio::test]
async fn every_candidate_url_gets_a_preview_in_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/one");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><head><title>One</title></head></html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/two");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><head><title>Two</title></head></html>");
    });

    let msg = format!(
        "primeiro {}/one depois {}/two",
        server.base_url(),
        server.base_url()
    );
    let report = report(engine(true).analyze(&msg).await);

    assert_eq!(report.previews.len(), 2);
    assert_eq!(report.previews[0].title, "One");
    assert_eq!(report.previews[1].title, "Two");
}

#[tokio::test]
async fn fetches_can_be_disabled_entirely() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/skip");
        then.status(200).body("ignored");
    });

    let mut cfg = test_config(true);
    cfg.fetch_links = false;
    let engine = Engine::new(cfg, Arc::new(FixedOracle(0.5))).unwrap();

    let msg = format!("veja {}/skip", server.base_url());
    let report = report(engine.analyze(&msg).await);

    assert!(report.previews.is_empty());
    page.assert_hits(0);
}
