mod common;

use common::{collect, context, page_json, Reply, StubCatalog};
use movie_finder::{FetchError, FetchErrorKind, SearchPhase, Submission, ViewEvent};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn three_pages_accumulate_in_order() {
    let stub = StubCatalog::paged(3, 20);
    let ctx = context(stub.clone(), "secret");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    assert_eq!(search.search("batman"), Submission::Issued);
    assert!(search.process_next().await);
    assert!(search.has_more_pages());

    assert!(search.load_more().is_issued());
    assert!(search.process_next().await);
    assert!(search.load_more().is_issued());
    assert!(search.process_next().await);

    assert_eq!(search.results().len(), 60);
    assert!(!search.has_more_pages());
    assert_eq!(search.current_page(), 3);
    assert_eq!(search.phase(), SearchPhase::Loaded);

    let ids: Vec<i64> = search.results().iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=60).collect::<Vec<_>>());

    assert_eq!(search.load_more(), Submission::Rejected);
    assert_eq!(stub.calls(), 3);

    let events = collect(&mut rx);
    let started = events.iter().filter(|e| **e == ViewEvent::FetchStarted).count();
    let finished = events.iter().filter(|e| **e == ViewEvent::FetchFinished).count();
    assert_eq!((started, finished), (3, 3));
}

#[tokio::test]
async fn requests_carry_auth_locale_and_page() {
    let stub = StubCatalog::paged(2, 1);
    let ctx = context(stub.clone(), "secret");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("o poderoso chefão");
    search.process_next().await;
    search.load_more();
    search.process_next().await;

    let urls = stub.urls();
    assert_eq!(urls.len(), 2);
    for (url, page) in urls.iter().zip(["1", "2"]) {
        assert_eq!(url.path(), "/3/search/movie");
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(params.contains(&("api_key".into(), "secret".into())));
        assert!(params.contains(&("language".into(), "pt-BR".into())));
        assert!(params.contains(&("query".into(), "o poderoso chefão".into())));
        assert!(params.contains(&("page".into(), page.into())));
    }
}

#[tokio::test]
async fn blank_queries_never_reach_the_catalog() {
    let stub = StubCatalog::paged(1, 5);
    let ctx = context(stub.clone(), "secret");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    assert_eq!(search.search(""), Submission::Cleared);
    assert_eq!(search.search("   "), Submission::Cleared);

    assert!(search.results().is_empty());
    assert_eq!(search.phase(), SearchPhase::Idle);
    assert!(!search.process_next().await);
    assert_eq!(stub.calls(), 0);
    assert_eq!(
        collect(&mut rx),
        vec![ViewEvent::ResultsUpdated, ViewEvent::ResultsUpdated]
    );
}

#[tokio::test]
async fn blank_query_after_results_clears_them() {
    let stub = StubCatalog::paged(2, 5);
    let ctx = context(stub.clone(), "secret");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("batman");
    search.process_next().await;
    assert_eq!(search.results().len(), 5);

    search.search(" ");
    assert!(search.results().is_empty());
    assert!(!search.has_more_pages());
    assert_eq!(search.query(), "");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    let stub = StubCatalog::paged(1, 5);
    let ctx = context(stub.clone(), "");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    assert!(search.search("matrix").is_issued());
    assert_eq!(search.drain(), 1);

    assert_eq!(search.phase(), SearchPhase::Error);
    assert_eq!(
        search.last_error().map(FetchError::kind),
        Some(FetchErrorKind::InvalidRequest)
    );
    assert_eq!(stub.calls(), 0);
    assert!(matches!(
        collect(&mut rx).as_slice(),
        [
            ViewEvent::FetchStarted,
            ViewEvent::FetchFinished,
            ViewEvent::Error(FetchError::InvalidRequest(_))
        ]
    ));
}

#[tokio::test]
async fn failed_first_page_reports_error() {
    let stub = StubCatalog::paged(1, 4);
    let ctx = context(stub.clone(), "secret");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("batman");
    search.process_next().await;
    collect(&mut rx);

    stub.reply(1, Reply::Fail("network is unreachable".into()));
    search.search("superman");
    search.process_next().await;

    // A new search clears the list before page 1 arrives.
    assert!(search.results().is_empty());
    assert_eq!(search.phase(), SearchPhase::Error);
    let events = collect(&mut rx);
    let message = events.last().and_then(ViewEvent::error_message).unwrap();
    assert!(message.contains("network is unreachable"));
}

#[tokio::test]
async fn failed_load_more_keeps_accumulated_pages() {
    let stub = StubCatalog::paged(3, 4);
    stub.reply(2, Reply::Fail("timed out".into()));
    let ctx = context(stub.clone(), "secret");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("batman");
    search.process_next().await;
    search.load_more();
    search.process_next().await;

    assert_eq!(search.results().len(), 4);
    assert_eq!(search.phase(), SearchPhase::Error);
    assert!(search.last_error().unwrap().kind().is_retryable());

    // The caller may retry explicitly.
    stub.reply(2, Reply::Body(page_json(2, 3, 5..9)));
    assert!(search.load_more().is_issued());
    search.process_next().await;
    assert_eq!(search.results().len(), 8);
    assert_eq!(search.current_page(), 2);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let stub = StubCatalog::new();
    stub.reply(1, Reply::Body(r#"{"status_code":7,"status_message":"Invalid API key"}"#.into()));
    let ctx = context(stub, "wrong");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("batman");
    search.process_next().await;

    assert_eq!(
        search.last_error().map(FetchError::kind),
        Some(FetchErrorKind::Decode)
    );
}

#[tokio::test]
async fn search_is_rejected_while_a_page_is_loading() {
    let stub = StubCatalog::paged(2, 3);
    stub.delay(1, Duration::from_millis(100));
    let ctx = context(stub.clone(), "secret");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search("batman");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(search.drain(), 0);
    assert!(search.is_loading());
    assert_eq!(search.search("robin"), Submission::Rejected);
    assert_eq!(search.load_more(), Submission::Rejected);

    search.process_next().await;
    assert_eq!(search.query(), "batman");
    assert_eq!(search.results().len(), 3);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn separate_screens_do_not_cancel_each_other() {
    let stub = StubCatalog::paged(1, 2);
    stub.delay(1, Duration::from_millis(50));
    let ctx = context(stub.clone(), "secret");

    let (tx_a, _rx_a) = mpsc::unbounded_channel();
    let (tx_b, _rx_b) = mpsc::unbounded_channel();
    let mut first = ctx.search_controller(tx_a);
    let mut second = ctx.search_controller(tx_b);

    first.search("batman");
    second.search("batman");
    first.process_next().await;
    second.process_next().await;

    assert_eq!(first.results().len(), 2);
    assert_eq!(second.results().len(), 2);
    assert_eq!(stub.calls(), 2);
}
