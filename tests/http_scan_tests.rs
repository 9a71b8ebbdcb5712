// End-to-end scans against a local mock HTTP server

use keyword_scout::fetch::{FetchSettings, fetch_page};
use keyword_scout::{FetchError, HttpFetcher, Scan};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let body = fetch_page(&fetcher, &format!("{}/", server.uri()), &FetchSettings::default())
        .await
        .unwrap();
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn test_http_fetcher_reports_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let result = fetch_page(
        &fetcher,
        &format!("{}/gone", server.uri()),
        &FetchSettings::default(),
    )
    .await;
    assert!(matches!(result, Err(FetchError::Status { status: 410, .. })));
}

#[tokio::test]
async fn test_http_fetcher_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let settings = FetchSettings::new(Duration::from_millis(200), "Mozilla/5.0");
    let result = fetch_page(&fetcher, &format!("{}/slow", server.uri()), &settings).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_scan_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        &format!(
            r#"<html><body>
                <a href="/shop">Shop</a>
                <a href="{base}/about">About</a>
                <a href="/broken">Broken</a>
                <a href="http://other.invalid/cats">Elsewhere</a>
                <a href="/shop">Shop again</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(&server, "/shop", "<p>Special offer: Cat food</p>").await;
    mount_html(&server, "/about", "<p>Welcome to our Catalog</p>").await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = Scan::new()
        .with_request_timeout(5)
        .run(&base, &["cat", "catalog", "dog", "CAT"])
        .await
        .unwrap();

    assert_eq!(
        report.links,
        vec![
            format!("{base}/shop"),
            format!("{base}/about"),
            format!("{base}/broken"),
        ]
    );

    let shop = format!("{base}/shop");
    let about = format!("{base}/about");
    let urls: Vec<Option<&str>> = report.records.iter().map(|r| r.url()).collect();
    assert_eq!(
        urls,
        vec![Some(shop.as_str()), Some(about.as_str()), None, Some(shop.as_str())]
    );
}

#[tokio::test]
async fn test_scan_with_unreachable_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = Scan::new()
        .with_fetcher(Arc::new(HttpFetcher::new().unwrap()))
        .run(&server.uri(), &["cat", "dog"])
        .await
        .unwrap();

    assert!(report.links.is_empty());
    assert_eq!(report.rows().len(), 2);
    assert!(report.rows().iter().all(|row| row.found == "No" && row.url == "-"));
}
