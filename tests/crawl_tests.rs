//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the directory server and exercise
//! the fetch/retry contract and the full crawl cycle end-to-end.

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yfb_scrape::classify::KnownUnits;
use yfb_scrape::config::CrawlOptions;
use yfb_scrape::crawler::{build_client, Crawler, FetchOutcome, Fetcher, StopReason};

/// Fetcher wired to the mock server, with no real backoff delay.
fn test_fetcher() -> Fetcher {
    let client = build_client("SESSION=test").expect("build client");
    Fetcher::new(client).with_backoff_base(0.0)
}

fn test_options() -> CrawlOptions {
    CrawlOptions {
        delay_secs: 0.0,
        ..CrawlOptions::default()
    }
}

fn test_crawler(max_pages: Option<u32>) -> Crawler {
    let options = CrawlOptions {
        max_pages,
        ..test_options()
    };
    Crawler::new(test_fetcher(), KnownUnits::default(), options)
}

/// One directory page: a selected college, some cards, an optional next link.
fn page_html(unit: &str, cards: &[(&str, &str, &str)], next_href: Option<&str>) -> String {
    let mut html = format!(
        r#"<html><body>
           <select id="college_select"><option selected>{unit}</option></select>"#
    );
    for (name, year, info) in cards {
        html.push_str(&format!(
            r#"<div class="student_container">
                 <div class="student_name"><h5>{name}</h5></div>
                 <div class="student_year">{year}</div>
                 <div class="student_info">{info}</div>
               </div>"#
        ));
    }
    if let Some(href) = next_href {
        html.push_str(&format!(r#"<div class="next"><a href="{href}">Next</a></div>"#));
    }
    html.push_str("</body></html>");
    html
}

#[tokio::test]
async fn test_retry_bound_on_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let outcome = test_fetcher().fetch(&url).await;

    assert!(matches!(outcome, FetchOutcome::Exhausted));
}

#[tokio::test]
async fn test_auth_rejection_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let outcome = test_fetcher().fetch(&url).await;

    match outcome {
        FetchOutcome::AuthRejected { status } => assert_eq!(status.as_u16(), 403),
        other => panic!("expected AuthRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_offsite_redirect_means_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "https://sso.example.edu/idp/login"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let outcome = test_fetcher().fetch(&url).await;

    assert!(matches!(outcome, FetchOutcome::SessionExpired));
}

#[tokio::test]
async fn test_same_host_redirect_is_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/switch"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/switch", server.uri())).unwrap();
    let outcome = test_fetcher().fetch(&url).await;

    match outcome {
        FetchOutcome::Success { final_url, .. } => {
            assert!(final_url.path().ends_with("/landing"));
        }
        other => panic!("expected Success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_crawl_accumulates_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/facebook/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "Pierson College",
            &[
                ("Jane Doe", "’27", "History<br>123 Main St"),
                ("John Roe", "’28", "Undeclared"),
            ],
            Some("/facebook/page2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/facebook/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "Pierson College",
            &[("Ann Poe", "’27", "Saybrook College<br>Economics")],
            None,
        )))
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/facebook/page1", server.uri())).unwrap();
    let outcome = test_crawler(None).run(start).await;

    assert_eq!(outcome.stop, StopReason::EndOfDirectory);
    assert!(!outcome.stop.is_failure());
    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.records.len(), 3);

    let jane = &outcome.records[0];
    assert_eq!(jane.name.as_deref(), Some("Jane Doe"));
    assert_eq!(jane.college.as_deref(), Some("Pierson College"));
    assert_eq!(jane.major.as_deref(), Some("History"));
    assert!(jane
        .source_url
        .as_deref()
        .unwrap()
        .ends_with("/facebook/page1"));
    assert!(jane.scraped_at.is_some());

    let ann = &outcome.records[2];
    assert_eq!(ann.college.as_deref(), Some("Saybrook College"));
    assert!(ann
        .source_url
        .as_deref()
        .unwrap()
        .ends_with("/facebook/page2"));
}

#[tokio::test]
async fn test_page_ceiling_stops_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/facebook/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "Pierson College",
            &[("Jane Doe", "’27", "History")],
            Some("/facebook/page2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/facebook/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/facebook/page1", server.uri())).unwrap();
    let outcome = test_crawler(Some(1)).run(start).await;

    assert_eq!(outcome.stop, StopReason::PageLimit);
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_page_without_cards_or_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/facebook/page1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>nothing here</body></html>"),
        )
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/facebook/page1", server.uri())).unwrap();
    let outcome = test_crawler(None).run(start).await;

    assert_eq!(outcome.stop, StopReason::EndOfDirectory);
    assert_eq!(outcome.pages, 1);
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_partial_results_kept_on_session_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/facebook/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "Pierson College",
            &[("Jane Doe", "’27", "History")],
            Some("/facebook/page2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/facebook/page2"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://sso.example.edu/login"),
        )
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/facebook/page1", server.uri())).unwrap();
    let outcome = test_crawler(None).run(start).await;

    assert_eq!(outcome.stop, StopReason::SessionExpired);
    assert!(outcome.stop.is_failure());
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name.as_deref(), Some("Jane Doe"));
}

#[tokio::test]
async fn test_fetch_exhaustion_keeps_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/facebook/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "Pierson College",
            &[("Jane Doe", "’27", "History")],
            Some("/facebook/page2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/facebook/page2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let start = Url::parse(&format!("{}/facebook/page1", server.uri())).unwrap();
    let outcome = test_crawler(None).run(start).await;

    assert_eq!(outcome.stop, StopReason::FetchExhausted);
    assert_eq!(outcome.records.len(), 1);
}
