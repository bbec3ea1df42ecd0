use crate::common::{comment, comment_page, test_config};
use serde_json::json;
use tempfile::TempDir;
use thread_sieve::crawler::{Coordinator, ForumClient};
use thread_sieve::records::NO_COMMENTS;
use thread_sieve::Post;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ForumClient {
    let dir = TempDir::new().unwrap();
    ForumClient::new(&test_config(&server.uri(), dir.path())).unwrap()
}

fn post(permalink: &str) -> Post {
    Post {
        title: "Where did my parcel go?".to_string(),
        score: 7,
        created_utc: 1_700_000_000.0,
        permalink: permalink.to_string(),
        selftext: String::new(),
    }
}

#[tokio::test]
async fn test_automoderator_comment_is_excluded_from_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/test/abc.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(vec![
            comment("AutoModerator", "Please read the rules", 1),
            comment("alice", "Check the recycling bin", 12),
            comment("bob", "Same happened to me", 3),
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(test_config(&server.uri(), dir.path())).unwrap();
    let rows = coordinator
        .process_posts(&[post("/r/test/abc")], "test", "delivery")
        .await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].comment_author, "alice");
    assert_eq!(rows[1].comment_author, "bob");
    assert!(rows.iter().all(|r| r.post_title == "Where did my parcel go?"));
    assert!(rows.iter().all(|r| r.category == "delivery"));
}

#[tokio::test]
async fn test_only_automoderator_yields_placeholder_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/test/solo.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(vec![comment(
            "AutoModerator",
            "Removed",
            1,
        )])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(test_config(&server.uri(), dir.path())).unwrap();
    let rows = coordinator
        .process_posts(&[post("/r/test/solo")], "test", "general_uk")
        .await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment_author, NO_COMMENTS);
    assert_eq!(rows[0].comment_score, 0);
    assert_eq!(rows[0].comment_datetime, "");
}

#[tokio::test]
async fn test_throttled_comments_retry_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/test/abc.json"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/test/abc.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(comment_page(vec![comment("alice", "hello", 2)])),
        )
        .mount(&server)
        .await;

    let comments = client(&server).fetch_comments("/r/test/abc").await;

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "alice");
    assert_eq!(comments[0].body, "hello");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_throttle_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/test/abc.json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let comments = client(&server).fetch_comments("/r/test/abc").await;

    assert!(comments.is_empty());
    // The first attempt plus exactly one retry
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failures_yield_no_comments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/test/gone.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/test/garbled.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.fetch_comments("/r/test/gone").await.is_empty());
    assert!(client.fetch_comments("/r/test/garbled").await.is_empty());
    assert!(client.fetch_comments("").await.is_empty());

    // The empty permalink never reaches the server
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_replies_and_more_stubs_are_skipped() {
    let server = MockServer::start().await;

    let with_reply = json!({
        "kind": "t1",
        "data": {
            "author": "carol",
            "body": "Top level",
            "score": 4,
            "created_utc": 1700000000,
            "replies": {"kind": "Listing", "data": {"children": [
                {"kind": "t1", "data": {"author": "dave", "body": "nested", "score": 1}}
            ]}}
        }
    });

    Mock::given(method("GET"))
        .and(path("/r/test/tree.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(vec![
            with_reply,
            json!({"kind": "more", "data": {"count": 40, "children": ["k1", "k2"]}}),
        ])))
        .mount(&server)
        .await;

    let comments = client(&server).fetch_comments("/r/test/tree").await;

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "carol");
    assert_eq!(comments[0].created_utc, 1_700_000_000.0);
}
