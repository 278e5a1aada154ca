// tests/orchestrator_test.rs

use std::sync::Arc;
use std::time::Duration;
use thinkscraper::error::{AppError, ScrapeError};
use thinkscraper::handler::PlatformRegistry;
use thinkscraper::orchestrator::{BatchState, Orchestrator};
use thinkscraper::testing::{ScriptedFetcher, line_handler};
use tokio_util::sync::CancellationToken;

const ALPHA_1: &str = "https://alpha.test/t/1";
const ALPHA_2: &str = "https://alpha.test/t/2";
const ALPHA_3: &str = "https://alpha.test/t/3";
const BETA_1: &str = "https://beta.test/p/1";

fn test_registry() -> PlatformRegistry {
    let mut registry = PlatformRegistry::new();
    registry.register("alpha", line_handler("alpha", &["alpha.test"]));
    registry.register("beta", line_handler("beta", &["beta.test"]));
    registry
}

fn orchestrator_with(fetcher: ScriptedFetcher) -> (Orchestrator, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(fetcher);
    let orchestrator = Orchestrator::new(test_registry(), fetcher.clone());
    (orchestrator, fetcher)
}

#[tokio::test]
async fn test_scrape_one_success() {
    let (mut orchestrator, fetcher) =
        orchestrator_with(ScriptedFetcher::new().respond(ALPHA_1, "first\nsecond\n\nthird"));

    let outcome = orchestrator.scrape_one(ALPHA_1).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.record_count(), 3);
    assert_eq!(outcome.error(), None);
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(orchestrator.records().len(), 3);
    assert_eq!(orchestrator.records()[0].platform(), "alpha");
    assert_eq!(orchestrator.state(), BatchState::Completed);
}

#[tokio::test]
async fn test_unclaimed_url_fails_without_fetching() {
    let (mut orchestrator, fetcher) = orchestrator_with(ScriptedFetcher::new());

    let outcome = orchestrator.scrape_one("https://unknown.test/x").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.error(), Some("No scraper supports URL"));
    assert_eq!(outcome.record_count(), 0);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_network_and_parse_failures_become_outcomes() {
    let fetcher = ScriptedFetcher::new()
        .fail(ALPHA_1, ScrapeError::Network("HTTP 503 error for x".to_string()))
        .respond(ALPHA_2, "<broken>")
        .respond(ALPHA_3, "   \n  ");
    let (mut orchestrator, _) = orchestrator_with(fetcher);

    let network = orchestrator.scrape_one(ALPHA_1).await;
    let parse = orchestrator.scrape_one(ALPHA_2).await;
    let empty = orchestrator.scrape_one(ALPHA_3).await;

    assert_eq!(network.error(), Some("HTTP 503 error for x"));
    assert_eq!(parse.error(), Some("Parsing failed: unexpected markup"));
    assert_eq!(empty.error(), Some("Parsing failed: No content retrieved from URL"));
    assert_eq!(orchestrator.outcomes().len(), 3);
}

#[tokio::test]
async fn test_invalid_url_is_a_validation_failure() {
    let (mut orchestrator, fetcher) = orchestrator_with(ScriptedFetcher::new());

    // 域名匹配但协议不是 http(s)
    let outcome = orchestrator.scrape_one("ftp://alpha.test/file").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.error(), Some("Invalid URL: ftp://alpha.test/file"));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_scrape_many_fail_fast_stops_at_first_failure() {
    let fetcher = ScriptedFetcher::new()
        .respond(ALPHA_1, "ok")
        .fail(ALPHA_2, ScrapeError::Network("down".to_string()))
        .respond(ALPHA_3, "ok");
    let (mut orchestrator, fetcher) = orchestrator_with(fetcher);

    let outcomes = orchestrator.scrape_many(&[ALPHA_1, ALPHA_2, ALPHA_3], true).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_success());
    assert!(!outcomes[1].is_success());
    assert_eq!(fetcher.calls(), vec![ALPHA_1, ALPHA_2]);
    assert_eq!(orchestrator.state(), BatchState::Aborted);
}

#[tokio::test]
async fn test_scrape_many_continue_processes_all_in_order() {
    let fetcher = ScriptedFetcher::new()
        .respond(ALPHA_1, "a\nb")
        .fail(ALPHA_2, ScrapeError::Network("down".to_string()))
        .respond(BETA_1, "c");
    let (mut orchestrator, _) = orchestrator_with(fetcher);

    let urls = [ALPHA_1, ALPHA_2, BETA_1];
    let outcomes = orchestrator.scrape_many(&urls, false).await;

    let order: Vec<&str> = outcomes.iter().map(|o| o.source_url()).collect();
    assert_eq!(order, urls);
    assert_eq!(orchestrator.state(), BatchState::Completed);

    let summary = Orchestrator::summary(&outcomes);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_records, 3);
    assert!((summary.success_rate - 66.666).abs() < 0.01);
}

#[tokio::test]
async fn test_scrape_platform_unknown_platform_is_rejected_before_fetching() {
    let (mut orchestrator, fetcher) = orchestrator_with(ScriptedFetcher::new());

    let result = orchestrator.scrape_platform("gamma", &[ALPHA_1]).await;

    match result {
        Err(AppError::Configuration(msg)) => {
            assert!(msg.contains("Platform 'gamma' not supported"));
            assert!(msg.contains("alpha, beta"));
        }
        other => panic!("期望配置错误, 实际: {:?}", other.map(|o| o.len())),
    }
    assert_eq!(fetcher.call_count(), 0);
    assert!(orchestrator.outcomes().is_empty());
}

#[tokio::test]
async fn test_scrape_platform_continues_after_failures() {
    let fetcher = ScriptedFetcher::new()
        .fail(ALPHA_1, ScrapeError::Network("down".to_string()))
        .respond(ALPHA_2, "ok");
    let (mut orchestrator, _) = orchestrator_with(fetcher);

    let outcomes = orchestrator
        .scrape_platform("  ALPHA ", &[ALPHA_1, BETA_1, ALPHA_2])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(!outcomes[0].is_success());
    // beta 的链接交给 alpha 处理器时被拒绝
    assert_eq!(
        outcomes[1].error(),
        Some(format!("This scraper does not support URL: {}", BETA_1).as_str())
    );
    assert!(outcomes[2].is_success());
}

#[tokio::test]
async fn test_transient_failure_scripts_are_replayed_in_order() {
    let fetcher = ScriptedFetcher::new()
        .fail(ALPHA_1, ScrapeError::Network("down".to_string()))
        .respond(ALPHA_1, "recovered");
    let (mut orchestrator, _) = orchestrator_with(fetcher);

    assert!(!orchestrator.scrape_one(ALPHA_1).await.is_success());
    assert!(orchestrator.scrape_one(ALPHA_1).await.is_success());
    assert!(orchestrator.scrape_one(ALPHA_1).await.is_success());
}

#[tokio::test]
async fn test_results_accumulate_until_reset() {
    let (mut orchestrator, _) = orchestrator_with(ScriptedFetcher::new().respond(ALPHA_1, "x\ny"));

    orchestrator.scrape_many(&[ALPHA_1, ALPHA_1], false).await;
    orchestrator.scrape_one("https://unknown.test").await;

    let summary = orchestrator.results_summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.total_records, 4);

    orchestrator.reset();
    assert!(orchestrator.outcomes().is_empty());
    assert!(orchestrator.records().is_empty());
    assert_eq!(orchestrator.state(), BatchState::Idle);
    assert_eq!(orchestrator.results_summary().total, 0);
}

#[tokio::test]
async fn test_cancelled_batch_skips_remaining_urls() {
    let token = CancellationToken::new();
    let fetcher = Arc::new(ScriptedFetcher::new().respond(ALPHA_1, "ok"));
    let mut orchestrator =
        Orchestrator::new(test_registry(), fetcher.clone()).with_cancellation(token.clone());
    token.cancel();

    let outcomes = orchestrator.scrape_many(&[ALPHA_1, ALPHA_2], false).await;

    assert!(outcomes.is_empty());
    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(orchestrator.state(), BatchState::Aborted);
}

#[tokio::test]
async fn test_cancellation_interrupts_in_flight_fetch() {
    let token = CancellationToken::new();
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_delay(Duration::from_secs(30))
            .respond(ALPHA_1, "ok"),
    );
    let mut orchestrator =
        Orchestrator::new(test_registry(), fetcher.clone()).with_cancellation(token.clone());

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let outcomes = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.scrape_many(&[ALPHA_1, ALPHA_2], false),
    )
    .await
    .expect("取消后批处理应立即结束");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].error(), Some("Operation cancelled"));
    assert_eq!(orchestrator.state(), BatchState::Aborted);
}

#[tokio::test]
async fn test_concurrent_batch_preserves_input_order() {
    let fetcher = ScriptedFetcher::new()
        .with_delay(Duration::from_millis(20))
        .respond(ALPHA_1, "a")
        .respond(ALPHA_2, "b\nc")
        .fail(ALPHA_3, ScrapeError::Network("down".to_string()))
        .respond(BETA_1, "d");
    let (mut orchestrator, fetcher) = orchestrator_with(fetcher);

    let urls = [ALPHA_1, ALPHA_2, ALPHA_3, BETA_1];
    let outcomes = orchestrator.scrape_many_concurrent(&urls, 3).await;

    let order: Vec<&str> = outcomes.iter().map(|o| o.source_url()).collect();
    assert_eq!(order, urls);
    assert_eq!(fetcher.call_count(), 4);
    assert_eq!(orchestrator.records().len(), 4);
    assert_eq!(orchestrator.state(), BatchState::Completed);
}

#[tokio::test]
async fn test_first_registered_handler_wins() {
    let mut registry = PlatformRegistry::new();
    registry.register("primary", line_handler("primary", &["shared.test"]));
    registry.register("secondary", line_handler("secondary", &["shared.test"]));
    let fetcher = Arc::new(ScriptedFetcher::new().respond("https://shared.test/a", "x"));
    let mut orchestrator = Orchestrator::new(registry, fetcher);

    orchestrator.scrape_one("https://shared.test/a").await;

    assert_eq!(orchestrator.records()[0].platform(), "primary");
}
