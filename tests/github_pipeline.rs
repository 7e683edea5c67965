use base64::Engine as _;
use readme_searcher::config::{Pagination, Settings};
use readme_searcher::search::{is_ranked, EnrichmentOutcome, UnavailableReason};
use readme_searcher::{Metrics, SearchError, Searcher};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.github.api_url = server.uri();
    settings.github.token = Some("test-token".to_string());
    settings.search.readme_timeout = 0.5;
    settings
}

fn item(index: usize, stars: u64) -> Value {
    json!({
        "name": format!("repo{}", index),
        "full_name": format!("owner{}/repo{}", index, index),
        "owner": { "login": format!("owner{}", index) },
        "description": format!("Repository number {}", index),
        "stargazers_count": stars,
        "language": "Rust",
        "html_url": format!("https://github.com/owner{}/repo{}", index, index)
    })
}

fn search_body(stars: &[u64], total: usize) -> Value {
    let items: Vec<Value> = stars
        .iter()
        .enumerate()
        .map(|(i, s)| item(i + 1, *s))
        .collect();
    json!({ "total_count": total, "incomplete_results": false, "items": items })
}

fn readme_body(text: &str) -> Value {
    // The API wraps base64 content at 60 columns
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect();
    json!({ "content": wrapped.join("\n"), "encoding": "base64" })
}

async fn mount_readme(server: &MockServer, index: usize, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner{}/repo{}/readme", index, index)))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn search_with_readmes_preserves_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "3"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[500, 300, 100], 3)))
        .expect(1)
        .mount(&server)
        .await;

    let long_readme = format!("# Repo one\n\n{}", "All work and no play. ".repeat(20));
    mount_readme(&server, 1, ResponseTemplate::new(200).set_body_json(readme_body(&long_readme))).await;
    mount_readme(&server, 2, ResponseTemplate::new(200).set_body_json(readme_body("# Two"))).await;
    mount_readme(
        &server,
        3,
        ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
    )
    .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    assert!(!searcher.is_degraded());

    let results = searcher.search_and_get_readmes("rust", 3).await.unwrap();

    let stars: Vec<u64> = results.iter().map(|r| r.stars).collect();
    assert_eq!(stars, vec![500, 300, 100]);
    assert_eq!(results[0].readme_content(), Some(long_readme.as_str()));
    assert_eq!(results[1].readme_content(), Some("# Two"));
    assert_eq!(results[2].readme, Some(EnrichmentOutcome::NotFound));
}

#[tokio::test]
async fn authentication_failure_aborts_without_readme_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner1/repo1/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(readme_body("never")))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    let err = searcher.search_and_get_readmes("rust", 3).await.unwrap_err();

    assert!(matches!(err, SearchError::Authentication(ref m) if m == "Bad credentials"));
}

#[tokio::test]
async fn quota_exhaustion_is_reported_as_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1893456000")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    let err = searcher.search_fast("rust", 3).await.unwrap_err();

    assert!(matches!(
        err,
        SearchError::RateLimited {
            reset_at: Some(1_893_456_000)
        }
    ));
}

#[tokio::test]
async fn slow_readme_is_marked_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(&[50, 40, 30, 20, 10], 5)),
        )
        .mount(&server)
        .await;

    for index in [1, 2, 4, 5] {
        let body = readme_body(&format!("# repo{}", index));
        mount_readme(&server, index, ResponseTemplate::new(200).set_body_json(body)).await;
    }
    mount_readme(
        &server,
        3,
        ResponseTemplate::new(200)
            .set_body_json(readme_body("# late"))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    let results = searcher.search_and_get_readmes("rust", 5).await.unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(
        results[2].readme,
        Some(EnrichmentOutcome::Unavailable {
            reason: UnavailableReason::Timeout
        })
    );
    for (i, repo) in results.iter().enumerate().filter(|(i, _)| *i != 2) {
        assert_eq!(repo.readme_content(), Some(format!("# repo{}", i + 1).as_str()));
    }
}

#[tokio::test]
async fn rate_limited_readme_does_not_abort_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[9, 8], 2)))
        .mount(&server)
        .await;
    mount_readme(&server, 1, ResponseTemplate::new(200).set_body_json(readme_body("ok"))).await;
    mount_readme(&server, 2, ResponseTemplate::new(429)).await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    let results = searcher.search_and_get_readmes("rust", 2).await.unwrap();

    assert_eq!(results[0].readme_content(), Some("ok"));
    assert_eq!(
        results[1].readme,
        Some(EnrichmentOutcome::Unavailable {
            reason: UnavailableReason::RateLimited
        })
    );
}

#[tokio::test]
async fn empty_domain_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();

    let err = searcher.search_and_get_readmes("", 5).await.unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));

    let err = searcher.search_and_get_readmes("rust", 0).await.unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));
}

#[tokio::test]
async fn empty_result_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let searcher = Searcher::from_settings(&settings(&server)).unwrap();
    let results = searcher
        .search_and_get_readmes("zzzz-no-such-topic", 5)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn paginates_with_small_pages() {
    let server = MockServer::start().await;

    let pages: [(&str, Vec<u64>); 3] = [("1", vec![90, 80]), ("2", vec![70, 60]), ("3", vec![50, 40])];
    for (page, stars) in pages.iter() {
        let offset = (page.parse::<usize>().unwrap() - 1) * 2;
        let items: Vec<Value> = stars
            .iter()
            .enumerate()
            .map(|(i, s)| item(offset + i + 1, *s))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("page", *page))
            .and(query_param("per_page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "total_count": 6, "items": items })),
            )
            .mount(&server)
            .await;
    }

    let mut auto = settings(&server);
    auto.search.page_size = 2;
    let searcher = Searcher::from_settings(&auto).unwrap();
    let results = searcher.search_fast("rust", 5).await.unwrap();

    assert_eq!(results.len(), 5);
    assert!(is_ranked(&results));
    assert_eq!(results[4].full_name, "owner5/repo5");

    let mut single = settings(&server);
    single.search.page_size = 2;
    single.search.pagination = Pagination::SinglePage;
    let searcher = Searcher::from_settings(&single).unwrap();
    let results = searcher.search_fast("rust", 5).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn degraded_mode_still_searches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[3, 2, 1], 3)))
        .mount(&server)
        .await;

    let mut degraded = settings(&server);
    degraded.github.token = None;
    let stats = Arc::new(Metrics::new());
    let searcher = Searcher::from_settings(&degraded)
        .unwrap()
        .with_stats(stats.clone());

    assert!(searcher.is_degraded());
    let results = searcher.search_fast("rust", 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(stats.snapshot().total_searches, 1);
}
