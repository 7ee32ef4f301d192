// Integration tests for the post operations against a mock server

use crate::helpers::{client_for, feed_body, post_json, posts_for};

use client_core::config::ClientConfig;
use client_core::error::api::ApiError;
use client_core::posts::{PostDraft, PostsApi};

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies the listing request shape: fixed page, offset zero,
/// author expansion, and envelope unwrapping into typed posts.
///
/// **WHY THIS MATTERS**: The feed is built from exactly this call. The
/// query parameters are the service contract for the fixed page size and
/// the expanded author the filters depend on.
///
/// **BUG THIS CATCHES**: Would catch dropping `_author=true` (silently
/// breaking the author filter) or misreading the envelope.
#[tokio::test]
async fn given_feed_response_when_listing_then_posts_are_typed_and_expanded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .and(query_param("_author", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let items = posts.list_posts().await.expect("listing succeeds");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Cats");
    assert_eq!(items[0].author_name(), "alice");
    assert_eq!(items[1].tags, vec!["dog"]);
}

/// **VALUE**: Verifies bare-array listing responses work identically.
///
/// **WHY THIS MATTERS**: The service sometimes skips the `{data, meta}`
/// wrapper; the feed must not blank when it does.
///
/// **BUG THIS CATCHES**: Would catch an envelope unwrap that requires the
/// `data` key.
#[tokio::test]
async fn given_bare_array_response_when_listing_then_posts_still_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([post_json(5, "Solo", "", "alice", &[])])),
        )
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let items = posts.list_posts().await.expect("listing succeeds");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 5);
}

#[tokio::test]
async fn given_null_data_when_getting_post_then_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts/77"))
        .and(query_param("_author", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let found = posts.get_post(77).await.expect("call succeeds");

    assert!(found.is_none(), "null data is the not-found fallback");
}

/// **VALUE**: Verifies create sends the draft and returns the echoed post.
///
/// **WHY THIS MATTERS**: The create page navigates to the new post's id;
/// the id must come back typed from the envelope.
///
/// **BUG THIS CATCHES**: Would catch sending a mis-shaped body or losing
/// the created id in the unwrap.
#[tokio::test]
async fn given_valid_create_response_when_creating_then_post_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/social/posts"))
        .and(body_json(json!({
            "title": "Cats",
            "body": "all about cats",
            "tags": ["cat"]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({
                "data": post_json(123, "Cats", "all about cats", "alice", &["cat"])
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let draft = PostDraft {
        title: String::from("Cats"),
        body: String::from("all about cats"),
        tags: vec![String::from("cat")],
    };
    let created = posts.create_post(&draft).await.expect("create succeeds");

    assert_eq!(created.id, 123);
}

/// **VALUE**: Verifies a 2xx create response without an id is a validation
/// error, not a success and not a deserialization panic.
///
/// **WHY THIS MATTERS**: Navigation needs the id; a contract-breaking
/// response must surface as a typed client-side validation failure.
///
/// **BUG THIS CATCHES**: Would catch trusting any 2xx create response.
#[tokio::test]
async fn given_create_response_without_id_when_creating_then_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/social/posts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "title": "Cats" } })),
        )
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let error = posts
        .create_post(&PostDraft::default())
        .await
        .expect_err("missing id must fail");

    assert!(matches!(error, ApiError::Validation { .. }));
}

#[tokio::test]
async fn given_update_and_delete_when_called_then_expected_endpoints_hit() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/social/posts/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": post_json(5, "Renamed", "", "alice", &[])
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/social/posts/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());

    let draft = PostDraft {
        title: String::from("Renamed"),
        ..PostDraft::default()
    };
    let updated = posts.update_post(5, &draft).await.expect("update succeeds");
    assert_eq!(updated.title, "Renamed");

    posts.delete_post(5).await.expect("delete succeeds");
}

#[tokio::test]
async fn given_config_built_api_when_listing_then_collection_and_page_size_apply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/posts"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    let mut config = ClientConfig::default();
    config.api.collection = String::from("blog");
    config.search.page_size = 25;

    let posts = PostsApi::from_config(client, &config);
    let items = posts.list_posts().await.expect("listing succeeds");
    assert!(items.is_empty());
}

#[tokio::test]
async fn given_server_error_when_listing_then_message_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "kaput" })))
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let error = posts.list_posts().await.expect_err("500 must fail");

    assert_eq!(error.user_message(), "kaput");
    assert_eq!(error.status_code().map(|s| s.0), Some(500));
}
