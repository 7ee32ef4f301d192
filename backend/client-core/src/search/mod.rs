//! Incremental search/filter pipeline.
//!
//! Debounces query and filter input, issues one listing fetch per accepted
//! input, filters the fetched page client-side, and hands the result to a
//! [`SearchSink`] for rendering.
//!
//! # Ordering
//!
//! Result application is gated on a sequence number, never on arrival
//! order. Each accepted input increments the sequence; a fetch resolving
//! under an older sequence is silently dropped, success or failure alike,
//! so network reordering cannot overwrite newer state. In-flight fetches
//! are never aborted, only ignored on stale arrival. The debounce timer is
//! single-flight: new input aborts a not-yet-fired timer before arming the
//! next one.

use crate::loader::LoadingCoordinator;
use crate::posts::PostsApi;

use common::Post;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;

/// Quiet period before an input change is accepted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Parsed value of the filter control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    None,
    /// Requires an exact (case-insensitive) tag on the post.
    Tag(String),
    /// Requires the post author to match the stored profile name.
    AuthorMine,
}

impl SearchFilter {
    /// Parse a raw filter control value (`""`, `tag:<value>`, `author:me`).
    /// Unrecognized values select no filter.
    pub fn parse(raw: &str) -> Self {
        if let Some(tag) = raw.strip_prefix("tag:") {
            return SearchFilter::Tag(tag.to_owned());
        }
        if raw == "author:me" {
            return SearchFilter::AuthorMine;
        }
        SearchFilter::None
    }
}

/// Render seam the UI layer implements.
pub trait SearchSink: Send + Sync {
    fn render(&self, posts: Vec<Post>);
    fn render_error(&self, message: String);
}

/// Client-side filtering of one fetched page.
///
/// The query matches as a case-insensitive substring of the title, body,
/// author display name, or space-joined tag list. The filter predicate is
/// AND-composed on top. `me` is the stored profile name; without one the
/// author-is-me filter is inert.
pub fn filter_posts(
    items: &[Post],
    query: &str,
    filter: &SearchFilter,
    me: Option<&str>,
) -> Vec<Post> {
    let needle = query.trim().to_lowercase();
    let me = me.map(str::to_lowercase);

    items
        .iter()
        .filter(|post| matches_query(post, &needle))
        .filter(|post| matches_filter(post, filter, me.as_deref()))
        .cloned()
        .collect()
}

fn matches_query(post: &Post, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(needle)
        || post.body.to_lowercase().contains(needle)
        || post.author_name().to_lowercase().contains(needle)
        || post.tags.join(" ").to_lowercase().contains(needle)
}

fn matches_filter(post: &Post, filter: &SearchFilter, me: Option<&str>) -> bool {
    match filter {
        SearchFilter::None => true,
        SearchFilter::Tag(tag) => {
            let tag = tag.to_lowercase();
            post.tags.iter().any(|t| t.to_lowercase() == tag)
        }
        SearchFilter::AuthorMine => match me {
            Some(me) => post.author_name().to_lowercase() == me,
            None => true,
        },
    }
}

#[derive(Default)]
struct SearchInput {
    query: String,
    filter: SearchFilter,
}

struct PipelineInner {
    posts: PostsApi,
    sink: Arc<dyn SearchSink>,
    loader: LoadingCoordinator,
    debounce: Duration,
    /// Latest accepted sequence number; the sole basis for staleness.
    seq: AtomicU64,
    input: Mutex<SearchInput>,
    armed: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct SearchPipeline {
    inner: Arc<PipelineInner>,
}

impl SearchPipeline {
    pub fn new(posts: PostsApi, sink: Arc<dyn SearchSink>, loader: LoadingCoordinator) -> Self {
        Self::with_debounce(posts, sink, loader, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(
        posts: PostsApi,
        sink: Arc<dyn SearchSink>,
        loader: LoadingCoordinator,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                posts,
                sink,
                loader,
                debounce,
                seq: AtomicU64::new(0),
                input: Mutex::new(SearchInput::default()),
                armed: Mutex::new(None),
            }),
        }
    }

    /// Record a query change and re-arm the debounce timer.
    pub fn set_query(&self, query: &str) {
        self.inner
            .input
            .lock()
            .expect("search input lock poisoned")
            .query = query.to_owned();
        self.schedule();
    }

    /// Record a filter change and re-arm the debounce timer.
    pub fn set_filter(&self, filter: SearchFilter) {
        self.inner
            .input
            .lock()
            .expect("search input lock poisoned")
            .filter = filter;
        self.schedule();
    }

    /// Dispatch immediately without debouncing (initial page load). Any
    /// fetch already in flight becomes stale.
    pub async fn refresh(&self) {
        PipelineInner::dispatch(Arc::clone(&self.inner)).await;
    }

    /// Number of inputs accepted so far.
    pub fn sequence(&self) -> u64 {
        self.inner.seq.load(Ordering::SeqCst)
    }

    fn schedule(&self) {
        let inner = Arc::clone(&self.inner);
        let mut armed = self.inner.armed.lock().expect("debounce timer lock poisoned");

        // Single-flight timer: new input invalidates the previous one.
        if let Some(timer) = armed.take() {
            timer.abort();
        }

        *armed = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            PipelineInner::dispatch(inner).await;
        }));
    }
}

impl PipelineInner {
    async fn dispatch(inner: Arc<Self>) {
        // Accepting the input bumps the sequence; every earlier in-flight
        // fetch is stale from here on.
        let seq = inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let (query, filter) = {
            let input = inner.input.lock().expect("search input lock poisoned");
            (input.query.clone(), input.filter.clone())
        };
        debug!("search fetch seq={seq} query={query:?}");

        let result = inner.loader.run(inner.posts.list_posts()).await;

        if inner.seq.load(Ordering::SeqCst) != seq {
            debug!("dropping stale search response seq={seq}");
            return;
        }

        match result {
            Ok(items) => {
                let me = inner.posts.client().store().profile().map(|p| p.name);
                let filtered = filter_posts(&items, &query, &filter, me.as_deref());
                inner.sink.render(filtered);
            }
            Err(error) => {
                warn!("search fetch seq={seq} failed: {error}");
                inner.sink.render_error(error.user_message());
            }
        }
    }
}
