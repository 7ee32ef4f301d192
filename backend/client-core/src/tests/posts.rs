// Unit tests for tag parsing; the HTTP surface of PostsApi is covered in
// integration_tests/posts.rs.

use crate::posts::parse_tags;

#[test]
fn given_comma_separated_input_when_parsed_then_tags_are_trimmed() {
    assert_eq!(parse_tags("cat, dog ,rust"), vec!["cat", "dog", "rust"]);
}

#[test]
fn given_empty_segments_when_parsed_then_they_are_dropped() {
    assert_eq!(parse_tags("cat,, ,dog,"), vec!["cat", "dog"]);
    assert!(parse_tags("").is_empty());
    assert!(parse_tags("  ,  ").is_empty());
}
