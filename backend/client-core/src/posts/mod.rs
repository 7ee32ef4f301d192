//! Post operations against the content service.

use crate::api_client::{ApiClient, RequestSpec, unwrap_envelope};
use crate::config::ClientConfig;
use crate::error::api::ApiError;

use common::Post;

use log::info;
use serde_json::{Value, json};

/// Fixed page size for listings; no further pagination.
pub const PAGE_SIZE: u32 = 50;

/// Title, body and tags for a create or full-replace update.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl PostDraft {
    fn to_json(&self) -> Value {
        json!({
            "title": self.title,
            "body": self.body,
            "tags": self.tags,
        })
    }
}

/// Split a comma-separated tag field into trimmed, non-empty tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Clone)]
pub struct PostsApi {
    client: ApiClient,
    collection: String,
    page_size: u32,
}

impl PostsApi {
    pub fn new(client: ApiClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
            page_size: PAGE_SIZE,
        }
    }

    /// Build from a loaded [`ClientConfig`]: collection segment and page
    /// size come from the config, the base URL is the client's.
    pub fn from_config(client: ApiClient, config: &ClientConfig) -> Self {
        Self {
            client,
            collection: config.api.collection.clone(),
            page_size: config.search.page_size,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn posts_path(&self) -> String {
        format!("{}/posts", self.collection)
    }

    /// Fetch one page of posts with authors expanded. Tolerates both the
    /// `{data, meta}` envelope and a bare array.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let target = format!(
            "{}?limit={}&offset=0&_author=true",
            self.posts_path(),
            self.page_size
        );
        let posts = self.client.execute_data(RequestSpec::get(target)).await?;
        Ok(posts.unwrap_or_default())
    }

    /// Fetch one post. `Ok(None)` when the envelope carries no data, which
    /// the detail page treats as not-found.
    pub async fn get_post(&self, id: u64) -> Result<Option<Post>, ApiError> {
        let target = format!("{}/{}?_author=true", self.posts_path(), id);
        self.client.execute_data(RequestSpec::get(target)).await
    }

    /// Create a post. The service must echo the new post back with its id;
    /// a 2xx response without one is a contract break.
    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let spec = RequestSpec::post(self.posts_path()).json(draft.to_json());
        let data = self
            .client
            .execute(spec)
            .await?
            .map(|value| unwrap_envelope(value).data)
            .unwrap_or(Value::Null);

        if data.get("id").is_none_or(Value::is_null) {
            return Err(ApiError::validation(
                "create response is missing the new post id",
            ));
        }

        let post: Post = serde_json::from_value(data)?;
        info!("created post {}", post.id);
        Ok(post)
    }

    /// Replace a post's title, body and tags.
    pub async fn update_post(&self, id: u64, draft: &PostDraft) -> Result<Post, ApiError> {
        let target = format!("{}/{}", self.posts_path(), id);
        let spec = RequestSpec::put(target).json(draft.to_json());
        let updated: Option<Post> = self.client.execute_data(spec).await?;
        updated.ok_or_else(|| ApiError::validation("update response did not include the post"))
    }

    /// Delete a post. The service answers `204 No Content`.
    pub async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        let target = format!("{}/{}", self.posts_path(), id);
        self.client.execute(RequestSpec::delete(target)).await?;
        info!("deleted post {id}");
        Ok(())
    }
}
