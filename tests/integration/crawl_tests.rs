//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! crawl and job flow end-to-end.

use scroopy::config::Config;
use scroopy::crawler::{Coordinator, FailureCause};
use scroopy::job::{run_job, JobRequest, SeedRequest};
use scroopy::output::OutputFormat;
use scroopy::storage::SqliteArchive;
use scroopy::{sanitize_title, ScroopyError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a GET route serving the given HTML
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html.to_string()),
        )
        .mount(server)
        .await;
}

fn coordinator() -> Coordinator {
    Coordinator::new(&Config::default()).expect("Failed to build coordinator")
}

#[tokio::test]
async fn test_single_page_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = coordinator().crawl_single(&url).await.unwrap_err();

    assert_eq!(err.url(), Some(url.as_str()));
    assert_eq!(err.cause(), Some(&FailureCause::HttpStatus(404)));
    assert!(matches!(err, ScroopyError::Crawl { .. }));
}

#[tokio::test]
async fn test_single_page_text() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Ignored</title></head><body>
            <div>Hello   world</div>
            <p>Outside any container</p>
            <div>Hello world</div>
            <div><script>var x = 1;</script>Second line</div>
        </body></html>"#,
    )
    .await;

    let text = coordinator()
        .crawl_single(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "Hello world\nSecond line");
}

#[tokio::test]
async fn test_duplicate_and_excluded_links() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(
        &server,
        "/",
        r#"<div>Home</div>
           <a href="/about">About</a>
           <a href="/about">About again</a>
           <a href="http://x.com/fb?ref=facebook">Share</a>"#,
    )
    .await;
    mount_page(&server, "/about", "<div>About us</div>").await;

    let crawl = coordinator().crawl_with_subpages(&seed).await.unwrap();

    assert_eq!(crawl.link_count, 1);
    assert!(crawl.failures.is_empty());
    assert_eq!(crawl.pages.len(), 2);

    let about = crawl
        .pages
        .get(&format!("{}/about", server.uri()))
        .expect("about page recorded");
    assert_eq!(about.content, "About us");
    assert_eq!(about.link_index, 1);
    assert!(!about.is_main_content);

    let home = crawl.pages.get(&seed).expect("seed recorded");
    assert_eq!(home.content, "Home");
    assert_eq!(home.link_index, 0);
    assert!(home.is_main_content);
}

#[tokio::test]
async fn test_relative_link_resolved_against_seed_directory() {
    let server = MockServer::start().await;
    let seed = format!("{}/dir/page", server.uri());

    mount_page(
        &server,
        "/dir/page",
        r#"<div>Seed page</div><a href="/sibling">Sibling</a>"#,
    )
    .await;
    mount_page(&server, "/dir/sibling", "<div>Sibling page</div>").await;

    let crawl = coordinator().crawl_with_subpages(&seed).await.unwrap();

    assert_eq!(crawl.link_count, 1);
    let urls: Vec<&str> = crawl.pages.urls().collect();
    let sibling = format!("{}/dir/sibling", server.uri());
    assert_eq!(urls, vec![seed.as_str(), sibling.as_str()]);

    let record = crawl.pages.get(&sibling).unwrap();
    assert_eq!(record.content, "Sibling page");
    assert_eq!(record.link_index, 1);
}

#[tokio::test]
async fn test_failing_sub_links_are_not_fatal() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(
        &server,
        "/",
        &format!(
            r#"<div>Only the seed</div>
               <a href="{0}/down">Down</a>
               <a href="{0}/gone">Gone</a>"#,
            server.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let crawl = coordinator().crawl_with_subpages(&seed).await.unwrap();

    assert_eq!(crawl.link_count, 2);
    assert_eq!(crawl.pages.len(), 1);
    assert_eq!(crawl.recorded_links(), 0);
    assert_eq!(crawl.recorded_links() + crawl.failures.len(), crawl.link_count);

    let causes: Vec<&FailureCause> = crawl.failures.iter().map(|f| &f.cause).collect();
    assert_eq!(
        causes,
        vec![&FailureCause::HttpStatus(503), &FailureCause::HttpStatus(410)]
    );
    assert_eq!(crawl.failures[0].link_index, 1);
    assert_eq!(crawl.failures[1].link_index, 2);
}

#[tokio::test]
async fn test_job_writes_all_artifacts() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(
        &server,
        "/",
        r#"<div>Welcome</div><a href="/a">A</a><a href="/b">B</a>"#,
    )
    .await;
    mount_page(&server, "/a", "<div>Page A</div>").await;
    mount_page(&server, "/b", "<div>Page B</div>").await;

    let dir = TempDir::new().unwrap();
    let request = JobRequest {
        seeds: vec![SeedRequest::new(seed.clone(), true)],
        output_dir: dir.path().to_path_buf(),
        formats: OutputFormat::ALL.to_vec(),
        config_hash: Some("test-hash".to_string()),
    };

    let report = run_job(&coordinator(), &request).await;

    assert!(report.is_success(), "errors: {:?}", report.errors);
    assert_eq!(report.config_hash.as_deref(), Some("test-hash"));
    assert_eq!(report.seeds.len(), 1);
    assert_eq!(report.seeds[0].pages, 3);
    assert_eq!(report.seeds[0].link_count, 2);
    assert_eq!(report.artifacts.len(), 3);

    let name = sanitize_title(&seed);

    // JSON keeps the recording order and the record field names
    let json_path = OutputFormat::Json.artifact_path(dir.path(), &name);
    let json = std::fs::read_to_string(&json_path).unwrap();
    let seed_pos = json.find(&format!("\"{}\"", seed)).unwrap();
    let a_pos = json.find(&format!("\"{}/a\"", server.uri())).unwrap();
    let b_pos = json.find(&format!("\"{}/b\"", server.uri())).unwrap();
    assert!(seed_pos < a_pos && a_pos < b_pos);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[&seed]["content"], "Welcome");
    assert_eq!(value[&seed]["main_content"], true);
    assert_eq!(value[format!("{}/b", server.uri())]["link_no"], 2);

    // SQLite archive round-trips the pages
    let archive_path = OutputFormat::Sqlite.artifact_path(dir.path(), &name);
    let archive = SqliteArchive::open(&archive_path).unwrap();
    let pages = archive.load_pages(&seed).unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages.get(&format!("{}/a", server.uri())).unwrap().content, "Page A");
    let run = archive.latest_run(&seed).unwrap().unwrap();
    assert_eq!(run.link_count, 2);

    // CSV has one row per page
    let csv_path = OutputFormat::Csv.artifact_path(dir.path(), &name);
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], seed.as_str());
    assert_eq!(&rows[2][1], "Page B");
}

#[tokio::test]
async fn test_job_reports_unreachable_seed() {
    // Nothing listens on port 9 locally; the connection is refused
    let dir = TempDir::new().unwrap();
    let request = JobRequest {
        seeds: vec![SeedRequest::new("http://127.0.0.1:9/", true)],
        output_dir: dir.path().to_path_buf(),
        formats: OutputFormat::ALL.to_vec(),
        config_hash: None,
    };

    let report = run_job(&coordinator(), &request).await;

    assert!(!report.is_success());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].url, "http://127.0.0.1:9/");
    assert!(report.artifacts.is_empty());
    assert_eq!(report.status_message(), "Completed with 1 errors");
}
