// Integration tests for the search pipeline against a mock server
// Debounce single-flight, sequence-number gating of out-of-order
// responses, loader composition and failure rendering.

use crate::helpers::{RecordingSink, feed_body, post_json, posts_for};

use client_core::credentials::CredentialStore;
use client_core::loader::LoadingCoordinator;
use client_core::search::{SearchFilter, SearchPipeline};

use common::Profile;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_DEBOUNCE: Duration = Duration::from_millis(100);

async fn settle() {
    // Comfortably past the test debounce plus mock round-trip.
    tokio::time::sleep(Duration::from_millis(400)).await;
}

/// **VALUE**: Verifies rapid successive inputs issue exactly one fetch for
/// the final value.
///
/// **WHY THIS MATTERS**: Typing "cat" must not fire three requests; the
/// debounce collapses the burst and the single accepted input carries the
/// final query.
///
/// **BUG THIS CATCHES**: Would catch arming a new timer without cancelling
/// the previous one, or accepting inputs before the quiet period ends.
#[tokio::test]
async fn given_rapid_inputs_when_debounced_then_single_fetch_for_final_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let sink = RecordingSink::new();
    let pipeline = SearchPipeline::with_debounce(
        posts,
        sink.clone(),
        LoadingCoordinator::new(),
        TEST_DEBOUNCE,
    );

    pipeline.set_query("c");
    tokio::time::sleep(Duration::from_millis(30)).await;
    pipeline.set_query("ca");
    tokio::time::sleep(Duration::from_millis(30)).await;
    pipeline.set_query("cat");
    settle().await;

    assert_eq!(pipeline.sequence(), 1, "exactly one accepted input");
    assert_eq!(
        sink.rendered_titles(),
        vec![vec![String::from("Cats")]],
        "one render, filtered by the final query"
    );
}

/// **VALUE**: Verifies an out-of-order response cannot overwrite newer
/// state: only the latest sequence renders.
///
/// **WHY THIS MATTERS**: This is the stale-response race the earlier
/// revisions of the feed shipped with. Sequence gating, not arrival order,
/// decides what renders; a slow old response arriving last must be
/// silently dropped.
///
/// **BUG THIS CATCHES**: Would catch applying results in arrival order or
/// comparing against anything but the latest sequence number.
#[tokio::test]
async fn given_delayed_older_fetch_when_resolving_last_then_result_is_dropped() {
    let server = MockServer::start().await;
    // First request: slow, answers with the stale feed, then exhausts.
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [post_json(1, "stale post", "", "alice", &[])] }))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    // Every later request: fast, fresh feed.
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "data": [post_json(2, "fresh post", "", "alice", &[])] }),
        ))
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let sink = RecordingSink::new();
    let pipeline = SearchPipeline::with_debounce(
        posts,
        sink.clone(),
        LoadingCoordinator::new(),
        TEST_DEBOUNCE,
    );

    let slow = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    pipeline.refresh().await;
    slow.await.expect("slow dispatch completes");

    assert_eq!(
        sink.rendered_titles(),
        vec![vec![String::from("fresh post")]],
        "only the newest sequence renders; the late stale response is dropped"
    );
    assert!(sink.errors().is_empty());
}

/// **VALUE**: Verifies a stale *failure* is dropped as silently as a stale
/// success.
///
/// **WHY THIS MATTERS**: A superseded request that happens to fail must
/// not flash an error over the fresh results the user is already seeing.
///
/// **BUG THIS CATCHES**: Would catch rendering errors before the sequence
/// gate.
#[tokio::test]
async fn given_delayed_older_fetch_when_failing_last_then_error_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "message": "stale failure" }))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body()))
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let sink = RecordingSink::new();
    let pipeline = SearchPipeline::with_debounce(
        posts,
        sink.clone(),
        LoadingCoordinator::new(),
        TEST_DEBOUNCE,
    );

    let slow = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    pipeline.refresh().await;
    slow.await.expect("slow dispatch completes");

    assert!(sink.errors().is_empty(), "stale failure must stay silent");
    assert_eq!(sink.rendered_titles().len(), 1);
}

/// **VALUE**: Verifies a current-sequence failure renders an error with
/// the normalized message.
///
/// **WHY THIS MATTERS**: Real failures must surface; only stale ones are
/// swallowed.
///
/// **BUG THIS CATCHES**: Would catch over-eager staleness checks that
/// silence every failure.
#[tokio::test]
async fn given_current_fetch_failure_when_resolving_then_error_rendered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "kaput" })))
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let sink = RecordingSink::new();
    let pipeline =
        SearchPipeline::new(posts, sink.clone(), LoadingCoordinator::new());

    pipeline.refresh().await;

    assert_eq!(sink.errors(), vec![String::from("kaput")]);
    assert!(sink.rendered_titles().is_empty());
}

/// **VALUE**: Verifies the loading coordinator is held for the duration of
/// a pipeline fetch.
///
/// **WHY THIS MATTERS**: The pipeline runs its fetches under the shared
/// busy indicator; visibility must span the whole request and clear once
/// it settles.
///
/// **BUG THIS CATCHES**: Would catch dispatch paths that bypass the
/// coordinator.
#[tokio::test]
async fn given_inflight_fetch_when_checked_then_loader_is_visible() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(feed_body())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let (posts, _store) = posts_for(&server.uri());
    let sink = RecordingSink::new();
    let loader = LoadingCoordinator::new();
    let pipeline = SearchPipeline::new(posts, sink.clone(), loader.clone());

    let dispatch = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(loader.is_visible(), "fetch in flight");

    dispatch.await.expect("dispatch completes");
    assert!(!loader.is_visible(), "indicator clears when the fetch settles");
}

/// **VALUE**: Verifies filter changes flow through the debounce and apply
/// the stored profile for author:me.
///
/// **WHY THIS MATTERS**: Facet clicks follow the same accepted-input path
/// as typing, and the author facet depends on the profile read at
/// resolution time.
///
/// **BUG THIS CATCHES**: Would catch filter changes bypassing the
/// debounce/sequence machinery or ignoring the profile.
#[tokio::test]
async fn given_author_filter_when_dispatched_then_only_own_posts_render() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (posts, store) = posts_for(&server.uri());
    store.set_profile(Some(Profile {
        name: String::from("Alice"),
        email: None,
    }));

    let sink = RecordingSink::new();
    let pipeline = SearchPipeline::with_debounce(
        posts,
        sink.clone(),
        LoadingCoordinator::new(),
        TEST_DEBOUNCE,
    );

    pipeline.set_filter(SearchFilter::AuthorMine);
    settle().await;

    assert_eq!(sink.rendered_titles(), vec![vec![String::from("Cats")]]);
}
