//! End-to-end pipeline tests against a local HTTP server: fetch the
//! listing, select the newest feed, download it to disk.

mod common;

use common::listing_server::{self, Route};
use gtfs_fetch::error::FetchError;
use gtfs_fetch::feed;
use gtfs_fetch::http::{self, TransportOptions};
use std::collections::HashMap;
use std::fs;
use url::Url;

fn routes(listing_html: &str) -> HashMap<String, Route> {
    let mut routes = HashMap::new();
    routes.insert("/".to_string(), Route::ok(listing_html.as_bytes().to_vec()));
    routes
}

#[test]
fn downloads_the_feed_with_the_latest_end_date() {
    let listing = r#"
        <html><body><pre>
          <a href="gtfs_2024_01_01_2024_03_31.zip">gtfs 2024_01_01 2024_03_31</a>
          <a href="gtfs_2024_04_01_2024_09_30.zip">gtfs 2024_04_01 2024_09_30</a>
          <a href="gtfs_2024_02_01_2024_05_31.zip">gtfs 2024_02_01 2024_05_31</a>
        </pre></body></html>
    "#;
    let mut routes = routes(listing);
    routes.insert(
        "/gtfs_2024_01_01_2024_03_31.zip".to_string(),
        Route::ok(b"winter feed".to_vec()),
    );
    routes.insert(
        "/gtfs_2024_04_01_2024_09_30.zip".to_string(),
        Route::ok(b"summer feed".to_vec()),
    );
    routes.insert(
        "/gtfs_2024_02_01_2024_05_31.zip".to_string(),
        Route::ok(b"spring feed".to_vec()),
    );
    let base = listing_server::start(routes);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("latest.zip");
    let page_url = Url::parse(&base).unwrap();

    let (chosen, bytes) =
        feed::fetch_latest(&page_url, &dest, &TransportOptions::default()).unwrap();

    assert!(chosen.url.ends_with("/gtfs_2024_04_01_2024_09_30.zip"));
    assert_eq!(bytes, "summer feed".len() as u64);
    assert_eq!(fs::read(&dest).unwrap(), b"summer feed");
    // No temp file left behind.
    assert!(!dir.path().join("latest.zip.part").exists());
}

#[test]
fn falls_back_to_the_last_listed_zip_when_nothing_is_dated() {
    let listing = r#"
        <a href="a.zip">first</a>
        <a href="b.zip">second</a>
        <a href="c.zip">third</a>
    "#;
    let mut routes = routes(listing);
    routes.insert("/c.zip".to_string(), Route::ok(b"last one".to_vec()));
    let base = listing_server::start(routes);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("fallback.zip");
    let page_url = Url::parse(&base).unwrap();

    let (chosen, _) =
        feed::fetch_latest(&page_url, &dest, &TransportOptions::default()).unwrap();

    assert!(chosen.url.ends_with("/c.zip"));
    // Fallback identity: display text is the URL itself.
    assert_eq!(chosen.text, chosen.url);
    assert_eq!(fs::read(&dest).unwrap(), b"last one");
}

#[test]
fn listing_without_zip_links_is_no_candidates() {
    let listing = r#"
        <a href="readme.txt">readme</a>
        <a href="feed.ZIP">uppercase is not a match</a>
    "#;
    let base = listing_server::start(routes(listing));
    let page_url = Url::parse(&base).unwrap();

    let err = feed::latest_feed(&page_url, &TransportOptions::default()).unwrap_err();
    assert!(matches!(err, FetchError::NoCandidatesFound));
}

#[test]
fn malformed_date_token_aborts_the_run() {
    let listing = r#"<a href="feed.zip">gtfs 2024_02_30</a>"#;
    let base = listing_server::start(routes(listing));
    let page_url = Url::parse(&base).unwrap();

    let err = feed::latest_feed(&page_url, &TransportOptions::default()).unwrap_err();
    assert!(matches!(err, FetchError::InvalidDateToken { .. }));
}

#[test]
fn missing_archive_is_an_http_status_error() {
    // Listing points at an archive the server does not have.
    let listing = r#"<a href="gone_2024_01_01.zip">gtfs 2024_01_01</a>"#;
    let base = listing_server::start(routes(listing));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("gone.zip");
    let page_url = Url::parse(&base).unwrap();

    let err =
        feed::fetch_latest(&page_url, &dest, &TransportOptions::default()).unwrap_err();
    match err {
        FetchError::HttpStatus { code, .. } => assert_eq!(code, 404),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    // Neither the destination nor a partial file is left behind.
    assert!(!dest.exists());
    assert!(!dir.path().join("gone.zip.part").exists());
}

#[test]
fn listing_page_error_status_is_fatal() {
    let mut routes = HashMap::new();
    routes.insert("/".to_string(), Route::status(503));
    let base = listing_server::start(routes);
    let page_url = Url::parse(&base).unwrap();

    let err = feed::latest_feed(&page_url, &TransportOptions::default()).unwrap_err();
    match err {
        FetchError::HttpStatus { code, .. } => assert_eq!(code, 503),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[test]
fn failed_finalize_does_not_leave_a_partial_file() {
    let mut routes = HashMap::new();
    routes.insert("/feed.zip".to_string(), Route::ok(b"feed bytes".to_vec()));
    let base = listing_server::start(routes);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("latest.zip");
    // Renaming a file onto an existing directory fails.
    fs::create_dir(&dest).unwrap();

    let url = format!("{base}feed.zip");
    let err =
        http::download_to_path(&url, &dest, &TransportOptions::default()).unwrap_err();
    assert!(matches!(err, FetchError::Storage(_)));
    assert!(!dir.path().join("latest.zip.part").exists());
}

#[test]
fn existing_destination_is_overwritten() {
    let listing = r#"<a href="feed_2024_05_01.zip">gtfs 2024_05_01</a>"#;
    let mut routes = routes(listing);
    routes.insert(
        "/feed_2024_05_01.zip".to_string(),
        Route::ok(b"fresh bytes".to_vec()),
    );
    let base = listing_server::start(routes);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("latest.zip");
    fs::write(&dest, b"stale bytes from an earlier run").unwrap();
    let page_url = Url::parse(&base).unwrap();

    feed::fetch_latest(&page_url, &dest, &TransportOptions::default()).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"fresh bytes");
}
