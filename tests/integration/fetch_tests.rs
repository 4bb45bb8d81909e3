//! HttpFetcher against a mock server

use clinic_probe::config::Config;
use clinic_probe::crawler::{HttpFetcher, PageFetcher};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(request_timeout_ms: u64) -> HttpFetcher {
    let mut config = Config::default();
    config.crawler.request_timeout_ms = request_timeout_ms;
    config.user_agent.value = "ProbeTest/1.0".to_string();
    HttpFetcher::new(&config).expect("Failed to build fetcher")
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).expect("Failed to parse URL")
}

#[tokio::test]
async fn test_fetch_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "ProbeTest/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    r#"<html><head><title>Smile Dental</title></head><body>
                    <p>Digital impressions with iTero</p>
                    <a href="/equipment">장비 소개</a>
                    </body></html>"#, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let page = fetcher(5_000).fetch(&url(&server, "/")).await.expect("fetch failed");

    assert_eq!(page.title.as_deref(), Some("Smile Dental"));
    assert!(page.text.contains("Digital impressions with iTero"));
    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].url, format!("{}/equipment", server.uri()));
    assert_eq!(page.links[0].anchor_text, "장비 소개");
}

#[tokio::test]
async fn test_fetch_decodes_euc_kr() {
    let server = MockServer::start().await;
    let (body, _, _) = encoding_rs::EUC_KR.encode("<html><body>구강스캐너 트리오스 보유</body></html>");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_owned(), "text/html; charset=euc-kr"))
        .mount(&server)
        .await;

    let page = fetcher(5_000).fetch(&url(&server, "/")).await.expect("fetch failed");
    assert_eq!(page.text, "구강스캐너 트리오스 보유");
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="page">relative</a>"#, "text/html"),
        )
        .mount(&server)
        .await;

    let page = fetcher(5_000).fetch(&url(&server, "/old")).await.expect("fetch failed");

    assert_eq!(page.final_url.path(), "/new/");
    assert_eq!(page.links[0].url, format!("{}/new/page", server.uri()));
}

#[tokio::test]
async fn test_fetch_http_error_is_not_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = fetcher(5_000)
        .fetch(&url(&server, "/missing"))
        .await
        .expect_err("404 should fail");

    assert_eq!(error.message, "HTTP 404");
    assert!(!error.is_timeout);
}

#[tokio::test]
async fn test_fetch_rejects_non_html() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let error = fetcher(5_000)
        .fetch(&url(&server, "/brochure"))
        .await
        .expect_err("PDF should be rejected");

    assert!(error.message.contains("application/pdf"));
    assert!(!error.is_timeout);
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let error = fetcher(300)
        .fetch(&url(&server, "/"))
        .await
        .expect_err("slow page should time out");

    assert!(error.is_timeout);
}
