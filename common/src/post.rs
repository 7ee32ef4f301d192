//! Post and author models as returned by the content service.

use serde::{Deserialize, Serialize};

/// Post author as expanded by the `_author=true` query flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A single post in a listing or detail response.
///
/// The service keys the expanded author inconsistently across endpoints:
/// newer responses use `author`, older ones the underscore-prefixed
/// `_author`. Both are deserialized; [`Post::resolved_author`] prefers
/// `author` and falls back to `_author`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(
        default,
        rename = "_author",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_author: Option<Author>,
}

impl Post {
    /// The author under either key, preferring the unprefixed field.
    pub fn resolved_author(&self) -> Option<&Author> {
        self.author.as_ref().or(self.legacy_author.as_ref())
    }

    /// Display name of the author, `"unknown"` when no author was expanded.
    pub fn author_name(&self) -> &str {
        self.resolved_author()
            .map(|a| a.name.as_str())
            .unwrap_or("unknown")
    }
}
