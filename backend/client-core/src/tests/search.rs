// Unit tests for filter parsing and client-side filtering
// Pipeline timing and stale-response gating are covered against a mock
// server in integration_tests/search.rs.

use crate::search::{SearchFilter, filter_posts};

use common::{Author, Post};

fn post(id: u64, title: &str, body: &str, author: &str, tags: &[&str]) -> Post {
    Post {
        id,
        title: title.to_owned(),
        body: body.to_owned(),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        author: Some(Author {
            name: author.to_owned(),
            email: None,
        }),
        legacy_author: None,
    }
}

fn sample() -> Vec<Post> {
    vec![
        post(1, "Cats", "all about cats", "alice", &["cat"]),
        post(2, "Dogs", "all about dogs", "bob", &["dog"]),
    ]
}

#[test]
fn given_filter_strings_when_parsed_then_variants_match() {
    assert_eq!(SearchFilter::parse(""), SearchFilter::None);
    assert_eq!(
        SearchFilter::parse("tag:rust"),
        SearchFilter::Tag(String::from("rust"))
    );
    assert_eq!(SearchFilter::parse("author:me"), SearchFilter::AuthorMine);
    // Unknown control values select no filter.
    assert_eq!(SearchFilter::parse("sort:newest"), SearchFilter::None);
}

/// **VALUE**: Verifies the query matches any of the four searched fields.
///
/// **WHY THIS MATTERS**: Search is the primary navigation on the feed; a
/// query must find a post whether the term sits in the title, body, author
/// name or tag list.
///
/// **BUG THIS CATCHES**: Would catch dropping one of the haystack fields
/// during a refactor.
#[test]
fn given_query_when_filtering_then_all_fields_are_searched() {
    let posts = sample();

    let by_title = filter_posts(&posts, "cat", &SearchFilter::None, None);
    assert_eq!(by_title.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

    let by_author = filter_posts(&posts, "bob", &SearchFilter::None, None);
    assert_eq!(by_author.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);

    let by_tag = filter_posts(&posts, "dog", &SearchFilter::None, None);
    assert_eq!(by_tag.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
}

/// **VALUE**: Verifies matching is case-insensitive on both sides.
///
/// **WHY THIS MATTERS**: Users type freely; `"CAT"` must match `"cat"` and
/// vice versa, for the query and for tag filters alike.
///
/// **BUG THIS CATCHES**: Would catch lowercasing only the needle or only
/// the haystack.
#[test]
fn given_mixed_case_input_when_filtering_then_matching_is_case_insensitive() {
    let posts = sample();

    let query = filter_posts(&posts, "CAT", &SearchFilter::None, None);
    assert_eq!(query.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

    let tag = filter_posts(&posts, "", &SearchFilter::Tag(String::from("DOG")), None);
    assert_eq!(tag.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
}

/// **VALUE**: Verifies tag filtering requires an exact tag, not a substring.
///
/// **WHY THIS MATTERS**: The tag filter is a strict facet; `"cat"` must not
/// select posts tagged `"category"`.
///
/// **BUG THIS CATCHES**: Would catch reusing the substring query predicate
/// for tag filtering.
#[test]
fn given_tag_filter_when_filtering_then_requires_exact_tag() {
    let posts = vec![
        post(1, "A", "", "alice", &["cat"]),
        post(2, "B", "", "alice", &["category"]),
    ];

    let filtered = filter_posts(&posts, "", &SearchFilter::Tag(String::from("cat")), None);
    assert_eq!(filtered.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
}

/// **VALUE**: Verifies author:me uses the stored profile and is inert
/// without one.
///
/// **WHY THIS MATTERS**: The "my posts" facet must follow whoever is signed
/// in, and selecting it while signed out must not blank the feed.
///
/// **BUG THIS CATCHES**: Would catch treating a missing profile as
/// matching nobody.
#[test]
fn given_author_mine_filter_when_filtering_then_profile_name_decides() {
    let posts = sample();

    let mine = filter_posts(&posts, "", &SearchFilter::AuthorMine, Some("Alice"));
    assert_eq!(mine.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

    let signed_out = filter_posts(&posts, "", &SearchFilter::AuthorMine, None);
    assert_eq!(signed_out.len(), 2, "filter is inert without a profile");
}

/// **VALUE**: Verifies the query and filter predicates AND together.
///
/// **WHY THIS MATTERS**: Both controls can be active at once; a post must
/// satisfy both to render.
///
/// **BUG THIS CATCHES**: Would catch OR-composition or the filter
/// overwriting the query result.
#[test]
fn given_query_and_filter_when_filtering_then_predicates_compose_with_and() {
    let posts = vec![
        post(1, "Cats", "", "alice", &["cat"]),
        post(2, "Cats again", "", "bob", &["dog"]),
    ];

    let both = filter_posts(&posts, "cats", &SearchFilter::Tag(String::from("dog")), None);
    assert_eq!(both.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn given_whitespace_query_when_filtering_then_treated_as_empty() {
    let posts = sample();
    let filtered = filter_posts(&posts, "   ", &SearchFilter::None, None);
    assert_eq!(filtered.len(), 2);
}
