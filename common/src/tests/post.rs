// Unit tests for post models
// Covers the author/_author keying fallback and lenient field defaults

use crate::post::{Author, Post};

/// **VALUE**: Verifies both author keys deserialize and the unprefixed one wins.
///
/// **WHY THIS MATTERS**: The service keys the expanded author inconsistently
/// (`author` vs `_author`) across endpoint revisions. Callers must get one
/// deterministic answer regardless of which key the response used.
///
/// **BUG THIS CATCHES**: Would catch a serde rename regression or a flipped
/// preference order in `resolved_author()`.
#[test]
fn given_both_author_keys_when_resolved_then_prefers_unprefixed() {
    let post: Post = serde_json::from_str(
        r#"{
            "id": 7,
            "title": "Cats",
            "author": { "name": "alice" },
            "_author": { "name": "bob" }
        }"#,
    )
    .expect("post should deserialize");

    assert_eq!(post.resolved_author().map(|a| a.name.as_str()), Some("alice"));
}

/// **VALUE**: Verifies the legacy `_author` key alone still resolves.
///
/// **WHY THIS MATTERS**: Older listing endpoints only send `_author`. Feed
/// rendering and the author:me filter both read through `resolved_author()`.
///
/// **BUG THIS CATCHES**: Would catch dropping the `_author` fallback when
/// cleaning up the model.
#[test]
fn given_only_legacy_author_key_when_resolved_then_falls_back() {
    let post: Post = serde_json::from_str(
        r#"{ "id": 7, "_author": { "name": "bob" } }"#,
    )
    .expect("post should deserialize");

    assert_eq!(post.resolved_author().map(|a| a.name.as_str()), Some("bob"));
    assert_eq!(post.author_name(), "bob");
}

/// **VALUE**: Verifies missing optional fields default instead of failing.
///
/// **WHY THIS MATTERS**: Listing responses omit empty titles, bodies and tag
/// arrays. A strict model would reject real service payloads.
///
/// **BUG THIS CATCHES**: Would catch removal of a `#[serde(default)]` that
/// turns a sparse-but-valid post into a deserialization error.
#[test]
fn given_sparse_post_when_deserialized_then_fields_default() {
    let post: Post = serde_json::from_str(r#"{ "id": 1 }"#).expect("post should deserialize");

    assert_eq!(post.title, "");
    assert_eq!(post.body, "");
    assert!(post.tags.is_empty());
    assert!(post.resolved_author().is_none());
    assert_eq!(post.author_name(), "unknown");
}

#[test]
fn given_post_when_serialized_then_absent_authors_are_omitted() {
    let post = Post {
        id: 3,
        title: String::from("Dogs"),
        body: String::new(),
        tags: vec![String::from("dog")],
        author: Some(Author {
            name: String::from("carol"),
            email: None,
        }),
        legacy_author: None,
    };

    let json = serde_json::to_value(&post).expect("post should serialize");
    assert!(json.get("_author").is_none());
    assert_eq!(json["author"]["name"], "carol");
}
