// Shared fixtures for the mock-server integration tests

use client_core::api_client::ApiClient;
use client_core::credentials::{CredentialStore, InMemoryCredentialStore};
use client_core::posts::PostsApi;
use client_core::search::SearchSink;

use common::Post;

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

/// Client wired to the mock server plus the store behind it.
pub fn client_for(server_uri: &str) -> (ApiClient, Arc<InMemoryCredentialStore>) {
    let store = Arc::new(InMemoryCredentialStore::new());
    let dyn_store: Arc<dyn CredentialStore> = store.clone();
    let client = ApiClient::new(server_uri, dyn_store).expect("client should build");
    (client, store)
}

pub fn posts_for(server_uri: &str) -> (PostsApi, Arc<InMemoryCredentialStore>) {
    let (client, store) = client_for(server_uri);
    (PostsApi::new(client, "social"), store)
}

/// Listing payload body: two posts, one per author, tags cat/dog.
pub fn feed_body() -> Value {
    json!({
        "data": [
            post_json(1, "Cats", "all about cats", "alice", &["cat"]),
            post_json(2, "Dogs", "all about dogs", "bob", &["dog"]),
        ],
        "meta": { "isFirstPage": true }
    })
}

pub fn post_json(id: u64, title: &str, body: &str, author: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "body": body,
        "tags": tags,
        "_author": { "name": author }
    })
}

/// Sink recording every render call for later assertion.
#[derive(Default)]
pub struct RecordingSink {
    rendered: Mutex<Vec<Vec<Post>>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rendered_titles(&self) -> Vec<Vec<String>> {
        self.rendered
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .map(|posts| posts.iter().map(|p| p.title.clone()).collect())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("sink lock poisoned").clone()
    }
}

impl SearchSink for RecordingSink {
    fn render(&self, posts: Vec<Post>) {
        self.rendered.lock().expect("sink lock poisoned").push(posts);
    }

    fn render_error(&self, message: String) {
        self.errors.lock().expect("sink lock poisoned").push(message);
    }
}
