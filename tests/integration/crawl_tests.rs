//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitemap_ripple::config::{Config, CrawlerConfig, UserAgentConfig};
use sitemap_ripple::crawler::Coordinator;
use sitemap_ripple::output::{build_entries, render_sitemap};
use sitemap_ripple::{CrawlError, RelativeLinks, SitemapError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and retry pauses
fn create_test_config(max_concurrent_fetches: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_fetches,
            request_timeout_ms: 2_000,
            connect_timeout_ms: 1_000,
            max_retries: 1,
            retry_delay_ms: 10, // Very short for testing
            relative_links: RelativeLinks::Verbatim,
            count_repeated_links: true,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_repeated_links_become_priorities() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a> <a href="/a">A again</a> <a href="/b">B</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "no links here").await;
    mount_page(&mock_server, "/b", "nor here").await;

    let coordinator = Coordinator::new(&create_test_config(4)).expect("client builds");
    let report = coordinator.run(&base_url).await.expect("crawl succeeds");

    let a = format!("{}a", base_url);
    let b = format!("{}b", base_url);
    assert_eq!(report.visit_counts.len(), 2);
    assert_eq!(report.visit_counts[&a], 2);
    assert_eq!(report.visit_counts[&b], 1);
    assert_eq!(report.pages_expanded, 3);
    assert!(report.is_complete());

    let entries = build_entries(&report.visit_counts).expect("urls were found");
    let xml = render_sitemap(&entries).unwrap();
    let expected = format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
            "  <url>\n",
            "    <loc>{}</loc>\n",
            "    <priority>1.00000</priority>\n",
            "  </url>\n",
            "  <url>\n",
            "    <loc>{}</loc>\n",
            "    <priority>0.00000</priority>\n",
            "  </url>\n",
            "</urlset>\n",
        ),
        a, b
    );
    assert_eq!(xml, expected);
}

#[tokio::test]
async fn test_absolute_same_host_and_external_links() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="{0}/docs">Docs</a>
               <a href="https://elsewhere.test/">Elsewhere</a>
               <a href="mailto:someone@example.com">Mail</a>"#,
            mock_server.uri()
        ),
    )
    .await;
    mount_page(&mock_server, "/docs", r#"<a href="/">Home</a>"#).await;

    let report = Coordinator::new(&create_test_config(2))
        .unwrap()
        .run(&base_url)
        .await
        .unwrap();

    assert_eq!(report.visit_counts.len(), 2);
    assert_eq!(report.visit_counts[&format!("{}docs", base_url)], 1);
    assert_eq!(report.visit_counts[&base_url], 1);
    assert!(report
        .visit_counts
        .keys()
        .all(|url| url.starts_with(&base_url)));

    // The base page is expanded once even though /docs links back to it
    let requests = mock_server.received_requests().await.unwrap();
    let root_fetches = requests.iter().filter(|r| r.url.path() == "/").count();
    assert_eq!(root_fetches, 1);
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", r#"<a href="/flaky">Flaky</a>"#).await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky", r#"<a href="/deep">Deep</a>"#).await;
    mount_page(&mock_server, "/deep", "").await;

    let report = Coordinator::new(&create_test_config(1))
        .unwrap()
        .run(&base_url)
        .await
        .unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.visit_counts[&format!("{}deep", base_url)], 1);
}

#[tokio::test]
async fn test_missing_page_is_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Gone</a> <a href="/ok">Fine</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", r#"<a href="/missing">Gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(&create_test_config(3))
        .unwrap()
        .run(&base_url)
        .await
        .unwrap();

    let missing = format!("{}missing", base_url);
    assert_eq!(report.visit_counts[&missing], 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, missing);
    assert!(matches!(report.failures[0].error, CrawlError::Fetch { .. }));
    assert!(!report.is_complete());
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_unreachable_base_is_an_error() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2) // one attempt plus one retry
        .mount(&mock_server)
        .await;

    let result = Coordinator::new(&create_test_config(2))
        .unwrap()
        .run(&base_url)
        .await;

    match result {
        Err(SitemapError::BaseUnreachable { url, .. }) => assert_eq!(url, base_url),
        other => panic!("expected BaseUnreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_page_without_links_yields_no_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", "<p>Nothing to see</p>").await;

    let report = Coordinator::new(&create_test_config(2))
        .unwrap()
        .run(&base_url)
        .await
        .unwrap();

    assert!(report.visit_counts.is_empty());
    assert!(build_entries(&report.visit_counts).is_none());
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html(r#"<a href="/x">X</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/x", "").await;

    let report = Coordinator::new(&create_test_config(1))
        .unwrap()
        .run(&base_url)
        .await
        .unwrap();

    assert_eq!(report.visit_counts.len(), 1);
}

#[tokio::test]
async fn test_counts_match_across_concurrency_levels() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a>"#,
    )
    .await;
    for page in ["/p1", "/p2", "/p3"] {
        mount_page(
            &mock_server,
            page,
            r#"<a href="/hub">Hub</a><a href="/">Home</a>"#,
        )
        .await;
    }
    mount_page(&mock_server, "/hub", r#"<a href="/p1">1</a>"#).await;

    let mut results = Vec::new();
    for concurrency in [1, 8] {
        let report = Coordinator::new(&create_test_config(concurrency))
            .unwrap()
            .run(&base_url)
            .await
            .unwrap();
        results.push(report.visit_counts);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0][&format!("{}hub", base_url)], 3);
    assert_eq!(results[0][&format!("{}p1", base_url)], 2);
    assert_eq!(results[0][&base_url], 3);
}
