//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock clinic websites and run the full
//! crawl cycle end-to-end over HTTP.

use clinic_probe::config::Config;
use clinic_probe::crawler::{BatchScheduler, HttpFetcher, SiteCrawler};
use clinic_probe::model::Target;
use clinic_probe::state::ConfidenceBand;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 10;
    config.crawler.request_timeout_ms = 2_000;
    config.scheduler.workers = 2;
    config
}

fn create_crawler(config: Config) -> SiteCrawler {
    let fetcher = HttpFetcher::new(&config).expect("Failed to build fetcher");
    SiteCrawler::new(Arc::new(fetcher), Arc::new(config))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// A clinic site whose equipment and about pages mention scanners
async fn scanner_clinic() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Smile Dental</title></head><body>
            <a href="/equipment">장비 소개</a>
            <a href="/notice">공지사항</a>
            <a href="/about">About us</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/equipment",
        "<html><head><title>Equipment</title></head><body>We scan with iTero and TRIOS in a CAD/CAM workflow.</body></html>",
    )
    .await;
    mount_page(
        &server,
        "/about",
        "<html><head><title>About</title></head><body>Our new Primescan arrived.</body></html>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/notice"))
        .respond_with(html("<p>itero</p>"))
        .expect(0)
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = scanner_clinic().await;
    let crawler = create_crawler(create_test_config());

    let target = Target::new(0, "Smile Dental", server.uri(), "info@smile.kr");
    let result = crawler.crawl(target, &CancellationToken::new()).await;

    // itero, trios, primescan + cad/cam + two evidence pages
    assert_eq!(result.score, 36 + 4 + 6);
    assert_eq!(result.band, ConfidenceBand::Medium);
    assert!(result.has_equipment);
    assert_eq!(result.pages_examined, 3);
    assert_eq!(
        result.evidence,
        "scanner: itero, trios, primescan | digital: cad/cam | pages examined: 3"
    );
    assert!(result.error.is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let crawler = create_crawler(create_test_config());
    let target = Target::new(0, "Closed Clinic", server.uri(), "");
    let result = crawler.crawl(target, &CancellationToken::new()).await;

    assert_eq!(result.band, ConfidenceBand::Error);
    assert!(result.error.contains("HTTP 503"));
    assert_eq!(result.status(), "error");
}

#[tokio::test]
async fn test_batch_over_several_sites() {
    let scanner = scanner_clinic().await;

    let plain = MockServer::start().await;
    mount_page(&plain, "/", "<html><body>Family dentistry since 1990</body></html>").await;

    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&down)
        .await;

    let config = create_test_config();
    let scheduler_config = config.scheduler.clone();
    let scheduler = BatchScheduler::new(create_crawler(config), &scheduler_config);

    let targets = vec![
        Target::new(0, "Down Dental", down.uri(), ""),
        Target::new(1, "Mail Only Dental", "", "mail@only.kr"),
        Target::new(2, "Smile Dental", scanner.uri(), ""),
        Target::new(3, "Plain Dental", plain.uri(), ""),
    ];

    let results = scheduler.run(targets).await;

    let bands: Vec<ConfidenceBand> = results.iter().map(|r| r.band).collect();
    assert_eq!(
        bands,
        vec![
            ConfidenceBand::Error,
            ConfidenceBand::None,
            ConfidenceBand::Medium,
            ConfidenceBand::None,
        ]
    );
    assert_eq!(results[1].reason, "no website");
    assert_eq!(results[3].reason, "no equipment keywords found (1 pages examined)");
}
