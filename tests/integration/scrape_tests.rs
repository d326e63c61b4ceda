//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for both the token host and the API
//! host, and run a full login-and-collect cycle end-to-end.

use std::path::{Path, PathBuf};
use sub_skimmer::reddit::CommentSort;
use sub_skimmer::table::OutputPaths;
use sub_skimmer::{AuthError, CollectOptions, Scraper, SkimmerError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a credentials file pointing both hosts at `base_url`
fn write_credentials(dir: &Path, base_url: &str) -> PathBuf {
    let content = format!(
        r#"
[bot1]
client-id = "abc123"
client-secret = "s3cr3t"
user-agent = "test:sub-skimmer:v1.0 (by /u/tester)"
reddit-url = "{base}"
oauth-url = "{base}"
"#,
        base = base_url
    );
    let path = dir.join("reddit.toml");
    std::fs::write(&path, content).expect("Failed to write credentials");
    path
}

fn post_listing(subreddit: &str, count: usize) -> String {
    let children: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"kind": "t3", "data": {{"id": "{sub}{i}", "title": "{sub} post {i}", "num_comments": {i}}}}}"#,
                sub = subreddit,
                i = i
            )
        })
        .collect();
    format!(
        r#"{{"kind": "Listing", "data": {{"after": null, "children": [{}]}}}}"#,
        children.join(",")
    )
}

/// One full page of 100 posts `p0..p99` with a cursor to the next page
fn first_page_listing() -> String {
    let children: Vec<String> = (0..100)
        .map(|i| {
            format!(
                r#"{{"kind": "t3", "data": {{"id": "p{i}", "title": "Post {i}", "num_comments": 1}}}}"#,
                i = i
            )
        })
        .collect();
    format!(
        r#"{{"kind": "Listing", "data": {{"after": "t3_p99", "children": [{}]}}}}"#,
        children.join(",")
    )
}

fn comment_page(post_id: &str, count: usize) -> String {
    let mut children: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"kind": "t1", "data": {{"body": "{id} comment {i}", "score": {score}}}}}"#,
                id = post_id,
                i = i,
                score = 100 - i as i64
            )
        })
        .collect();
    children.push(r#"{"kind": "more", "data": {"count": 3, "children": ["a", "b"]}}"#.to_string());
    format!(
        r#"[{{"kind": "Listing", "data": {{"children": []}}}}, {{"kind": "Listing", "data": {{"children": [{}]}}}}]"#,
        children.join(",")
    )
}

async fn mount_token(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"access_token": "integration-token", "expires_in": 3600}"#),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_subreddit(mock_server: &MockServer, subreddit: &str, posts: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/r/{}/top", subreddit)))
        .and(query_param("t", "all"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(post_listing(subreddit, posts)))
        .mount(mock_server)
        .await;

    // Post i has i comments
    for i in 0..posts {
        let id = format!("{}{}", subreddit, i);
        Mock::given(method("GET"))
            .and(path(format!("/comments/{}", id)))
            .and(header("authorization", "Bearer integration-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(comment_page(&id, i)))
            .mount(mock_server)
            .await;
    }
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV output");
    let headers = reader
        .headers()
        .expect("Missing header row")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Bad CSV row").iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn test_full_scrape_two_subreddits() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_subreddit(&mock_server, "nba", 5).await;
    mount_subreddit(&mock_server, "nfl", 2).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());
    let base = dir.path().join("harvest").display().to_string();

    let scraper = Scraper::new(
        &credentials,
        "bot1",
        vec!["nba".to_string(), "nfl".to_string()],
        false,
    )
    .await
    .expect("Failed to create scraper");

    let options = CollectOptions::new(10, 2)
        .file_path(Some(base.clone()))
        .save_period(Some(2));
    let (table, report) = scraper
        .collect_with_report(&options)
        .await
        .expect("Scrape failed");

    // All returned posts, in subreddit order
    assert_eq!(table.len(), 7);
    assert_eq!(report.total_posts(), 7);
    assert_eq!(table.rows()[0].title, "nba post 0");
    assert_eq!(table.rows()[5].title, "nfl post 0");

    // Filled slots are min(comment limit, available comments)
    let filled: Vec<usize> = table.rows().iter().map(|r| r.filled_slots()).collect();
    assert_eq!(filled, vec![0, 1, 2, 2, 2, 0, 1]);

    let paths = OutputPaths::new(base);
    assert!(paths.batch("nba", 1).exists());
    assert!(paths.batch("nba", 2).exists());
    assert!(!paths.batch("nba", 3).exists());
    assert!(paths.batch("nfl", 1).exists());
    assert!(paths.subreddit("nba").exists());
    assert!(paths.subreddit("nfl").exists());
    assert_eq!(report.batches_flushed, 3);

    let (headers, rows) = read_rows(&paths.combined());
    assert_eq!(
        headers,
        vec![
            "",
            "Title",
            "Top_comment_1",
            "Top_comment_1-score",
            "Top_comment_2",
            "Top_comment_2-score",
            "Subreddit"
        ]
    );
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[2], vec!["2", "nba post 2", "nba2 comment 0", "100", "nba2 comment 1", "99", "nba"]);
    assert_eq!(rows[0], vec!["0", "nba post 0", "", "", "", "", "nba"]);
    assert_eq!(rows[6][6], "nfl");

    let (batch_headers, batch_rows) = read_rows(&paths.batch("nba", 2));
    assert!(!batch_headers.contains(&"Subreddit".to_string()));
    assert_eq!(batch_rows.len(), 2);
    assert_eq!(batch_rows[0][1], "nba post 2");
}

#[tokio::test]
async fn test_in_memory_scrape_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_subreddit(&mock_server, "nba", 3).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());

    let scraper = Scraper::new(&credentials, "bot1", vec!["nba".to_string()], false)
        .await
        .expect("Failed to create scraper")
        .with_comment_sort(CommentSort::Top);

    let table = scraper
        .collect(&CollectOptions::new(3, 2).save_period(None))
        .await
        .expect("Scrape failed");

    assert_eq!(table.len(), 3);
    assert!(table.is_tagged());

    // Only the credentials file is in the directory
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_unknown_bot_fails_construction() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());

    let result = Scraper::new(&credentials, "bot9", vec![], false).await;
    assert!(matches!(
        result,
        Err(SkimmerError::Authentication(AuthError::UnknownBot { .. }))
    ));
}

#[tokio::test]
async fn test_rejected_token_fails_construction() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());

    let result = Scraper::new(&credentials, "bot1", vec!["nba".to_string()], false).await;
    assert!(matches!(
        result,
        Err(SkimmerError::Authentication(AuthError::TokenRejected { status: 401 }))
    ));
}

#[tokio::test]
async fn test_api_failure_propagates() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/r/nba/top"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());
    let base = dir.path().join("harvest").display().to_string();

    let scraper = Scraper::new(&credentials, "bot1", vec!["nba".to_string()], false)
        .await
        .expect("Failed to create scraper");

    let result = scraper
        .collect(&CollectOptions::new(5, 1).file_path(Some(base.clone())))
        .await;

    assert!(matches!(result, Err(SkimmerError::Api { status: 503, .. })));
    assert!(!OutputPaths::new(base).combined().exists());
}

#[tokio::test]
async fn test_failing_listing_page_keeps_earlier_batches() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/r/nba/top"))
        .and(query_param("after", "t3_p99"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/nba/top"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(first_page_listing()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/comments/p\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(comment_page("p", 1)))
        .expect(100)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = write_credentials(dir.path(), &mock_server.uri());
    let base = dir.path().join("harvest").display().to_string();

    let scraper = Scraper::new(&credentials, "bot1", vec!["nba".to_string()], false)
        .await
        .expect("Failed to create scraper");

    let result = scraper
        .collect(
            &CollectOptions::new(200, 1)
                .file_path(Some(base.clone()))
                .save_period(Some(50)),
        )
        .await;

    assert!(matches!(result, Err(SkimmerError::Api { status: 503, .. })));

    let paths = OutputPaths::new(base);
    let (_, first) = read_rows(&paths.batch("nba", 1));
    let (_, second) = read_rows(&paths.batch("nba", 2));
    assert_eq!(first.len(), 50);
    assert_eq!(second.len(), 50);
    assert_eq!(second[49][1], "Post 99");
    assert!(!paths.combined().exists());
}
