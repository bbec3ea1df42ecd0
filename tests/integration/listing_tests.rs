use crate::common::{listing_page, permalinks, post, test_config};
use tempfile::TempDir;
use thread_sieve::crawler::{ForumClient, ListingMode, StopReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOT_PATH: &str = "/r/AskUK/hot/.json";
const SEARCH_PATH: &str = "/r/AskUK/search.json";

fn client(server: &MockServer, page_size: u32, max_search_pages: u32) -> ForumClient {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.limits.page_size = page_size;
    config.limits.max_search_pages = max_search_pages;
    ForumClient::new(&config).unwrap()
}

/// Mounts a page answering requests that carry `after`
async fn mount_after(server: &MockServer, route: &str, after: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("after", after))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the first page; must be mounted after the cursor-specific pages
async fn mount_first(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pages_until_target_with_overshoot() {
    let server = MockServer::start().await;

    mount_after(
        &server,
        HOT_PATH,
        "c2",
        listing_page(vec![post("AskUK", "p5"), post("AskUK", "p6")], Some("c3")),
    )
    .await;
    mount_after(
        &server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p3"), post("AskUK", "p4")], Some("c2")),
    )
    .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1"), post("AskUK", "p2")], Some("c1")),
    )
    .await;

    let listing = client(&server, 2, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 5)
        .await;

    assert_eq!(listing.stop, StopReason::TargetReached);
    assert_eq!(listing.pages, 3);
    // The third page is kept whole even though only one post was needed
    assert_eq!(listing.posts.len(), 6);
    assert_eq!(listing.posts[0].permalink, "/r/AskUK/comments/p1/");
    assert_eq!(listing.posts[5].permalink, "/r/AskUK/comments/p6/");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.url.query_pairs().any(|(k, v)| k == "limit" && v == "2")));
}

#[tokio::test]
async fn test_null_cursor_discards_its_page() {
    let server = MockServer::start().await;

    mount_after(
        &server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p3")], None),
    )
    .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1"), post("AskUK", "p2")], Some("c1")),
    )
    .await;

    let listing = client(&server, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::CursorExhausted);
    assert_eq!(
        permalinks(&listing.posts),
        vec!["/r/AskUK/comments/p1/", "/r/AskUK/comments/p2/"]
    );
}

#[tokio::test]
async fn test_empty_page_ends_listing() {
    let server = MockServer::start().await;

    mount_after(&server, HOT_PATH, "c1", listing_page(vec![], Some("c2"))).await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1")], Some("c1")),
    )
    .await;

    let listing = client(&server, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::EmptyPage);
    assert_eq!(listing.posts.len(), 1);
    assert!(!listing.stop.is_failure());
}

#[tokio::test]
async fn test_repeated_cursor_ends_listing() {
    let server = MockServer::start().await;

    mount_after(
        &server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p2")], Some("c1")),
    )
    .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1")], Some("c1")),
    )
    .await;

    let listing = client(&server, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::CursorRepeated);
    assert_eq!(permalinks(&listing.posts), vec!["/r/AskUK/comments/p1/"]);
}

#[tokio::test]
async fn test_throttled_page_is_retried_with_same_cursor() {
    let server = MockServer::start().await;

    // Throttle the first request for page two only
    Mock::given(method("GET"))
        .and(path(HOT_PATH))
        .and(query_param("after", "c1"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_after(
        &server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p3"), post("AskUK", "p4")], None),
    )
    .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1"), post("AskUK", "p2")], Some("c1")),
    )
    .await;

    let listing = client(&server, 2, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    // Same outcome as an unthrottled run: page two has no cursor and is dropped
    assert_eq!(listing.stop, StopReason::CursorExhausted);
    assert_eq!(
        permalinks(&listing.posts),
        vec!["/r/AskUK/comments/p1/", "/r/AskUK/comments/p2/"]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url, requests[2].url);
}

/// Three pages of posts followed by an empty page
async fn mount_three_pages(server: &MockServer) {
    mount_after(
        server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p3")], Some("c2")),
    )
    .await;
    mount_after(server, HOT_PATH, "c2", listing_page(vec![], None)).await;
    mount_first(
        server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1"), post("AskUK", "p2")], Some("c1")),
    )
    .await;
}

#[tokio::test]
async fn test_throttling_then_success_matches_unthrottled_result() {
    let plain = MockServer::start().await;
    mount_three_pages(&plain).await;

    let throttled = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HOT_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&throttled)
        .await;
    mount_three_pages(&throttled).await;

    let expected = client(&plain, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;
    let actual = client(&throttled, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(permalinks(&actual.posts), permalinks(&expected.posts));
    assert_eq!(actual.posts.len(), 3);
    assert_eq!(actual.stop, expected.stop);
}

#[tokio::test]
async fn test_upstream_error_returns_partial_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOT_PATH))
        .and(query_param("after", "c1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1"), post("AskUK", "p2")], Some("c1")),
    )
    .await;

    let listing = client(&server, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::UpstreamStatus(503));
    assert!(listing.stop.is_failure());
    assert_eq!(listing.posts.len(), 2);
}

#[tokio::test]
async fn test_malformed_body_returns_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(HOT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let listing = client(&server, 100, 20)
        .fetch_listing("AskUK", &ListingMode::Hot, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::Malformed);
    assert!(listing.posts.is_empty());
}

#[tokio::test]
async fn test_search_stops_at_page_cap() {
    let server = MockServer::start().await;

    mount_after(
        &server,
        SEARCH_PATH,
        "c2",
        listing_page(vec![post("AskUK", "p3")], Some("c3")),
    )
    .await;
    mount_after(
        &server,
        SEARCH_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p2")], Some("c2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", "Tesco delivery"))
        .and(query_param("restrict_sr", "1"))
        .and(query_param("sort", "relevance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing_page(vec![post("AskUK", "p1")], Some("c1"))),
        )
        .mount(&server)
        .await;

    let mode = ListingMode::Search {
        query: "Tesco delivery".to_string(),
    };
    let listing = client(&server, 100, 2)
        .fetch_listing("AskUK", &mode, 1000)
        .await;

    assert_eq!(listing.stop, StopReason::PageCap);
    assert_eq!(listing.pages, 2);
    assert_eq!(
        permalinks(&listing.posts),
        vec!["/r/AskUK/comments/p1/", "/r/AskUK/comments/p2/"]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_hot_listing_ignores_page_cap() {
    let server = MockServer::start().await;

    mount_after(
        &server,
        HOT_PATH,
        "c2",
        listing_page(vec![post("AskUK", "p3")], Some("c3")),
    )
    .await;
    mount_after(
        &server,
        HOT_PATH,
        "c1",
        listing_page(vec![post("AskUK", "p2")], Some("c2")),
    )
    .await;
    mount_first(
        &server,
        HOT_PATH,
        listing_page(vec![post("AskUK", "p1")], Some("c1")),
    )
    .await;

    let listing = client(&server, 100, 1)
        .fetch_listing("AskUK", &ListingMode::Hot, 3)
        .await;

    assert_eq!(listing.stop, StopReason::TargetReached);
    assert_eq!(listing.posts.len(), 3);
}
