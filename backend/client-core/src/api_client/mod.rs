//! Authenticated request pipeline for the content service.
//!
//! Builds absolute request targets, injects auth headers read from the
//! credential store at call time, and normalizes success and error bodies
//! so callers see one result shape and one error type.

use crate::API_KEY_HEADER;
use crate::credentials::CredentialStore;
use crate::error::api::ApiError;

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

static ABSOLUTE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("absolute URL pattern is valid"));

/// One HTTP call: method, target (relative path or absolute URL), extra
/// headers and an optional body. Immutable once handed to [`ApiClient`].
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub json: Option<Value>,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: Vec::new(),
            json: None,
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::PUT, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body. Ignored if a raw [`Self::body`] is also set.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Attach a pre-serialized body verbatim.
    pub fn body(mut self, raw: impl Into<String>) -> Self {
        self.body = Some(raw.into());
        self
    }

    fn has_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
    }
}

/// Normalized response wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub data: Value,
    pub meta: Option<Value>,
}

/// The service is inconsistent about wrapping responses in `{data, meta}`.
/// Objects carrying a `data` key unwrap; anything else is treated as bare
/// data. Applied exactly once, at this boundary.
pub fn unwrap_envelope(value: Value) -> Envelope {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            let meta = map.remove("meta");
            Envelope { data, meta }
        }
        other => Envelope {
            data: other,
            meta: None,
        },
    }
}

/// Resolve a relative path against the base URL with exactly one separating
/// slash; absolute URLs pass through verbatim.
pub(crate) fn resolve_target(base_url: &str, target: &str) -> String {
    if ABSOLUTE_URL.is_match(target) {
        return target.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        target.trim_start_matches('/')
    )
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    store: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT_DURATION)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Execute one call and normalize the outcome.
    ///
    /// `Ok(None)` for `204 No Content`; otherwise the parsed JSON body,
    /// falling back to the raw text when a 2xx body is not valid JSON.
    /// Any non-2xx status becomes [`ApiError::Http`] carrying the status
    /// and the full parsed payload; transport failures never leak raw.
    pub async fn execute(&self, spec: RequestSpec) -> Result<Option<Value>, ApiError> {
        let url = resolve_target(&self.base_url, &spec.target);
        debug!("{} {}", spec.method, url);

        let mut request = self.client.request(spec.method.clone(), &url);

        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(raw) = &spec.body {
            request = request.body(raw.clone());
        } else if let Some(json) = &spec.json {
            if !spec.has_content_type() {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(serde_json::to_string(json)?);
        }

        // Credentials are read per call, never cached, so rotation applies
        // to the next request. Absence of either is not an error.
        if let Some(token) = self.store.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
        }
        if let Some(key) = self.store.api_key() {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        // 204 carries no body by definition; skip the parse entirely.
        if status == 204 {
            return Ok(None);
        }

        let text = response.text().await?;
        let payload = parse_body(&text);

        if !common::HttpStatusCode(status).is_success() {
            return Err(ApiError::from_failure(status, payload));
        }

        Ok(payload)
    }

    /// Execute, unwrap the response envelope, and deserialize its data.
    pub async fn execute_data<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<Option<T>, ApiError> {
        let Some(value) = self.execute(spec).await? else {
            return Ok(None);
        };
        match unwrap_envelope(value).data {
            Value::Null => Ok(None),
            data => Ok(Some(serde_json::from_value(data)?)),
        }
    }
}

/// Tolerant body parse: JSON when possible, raw text otherwise, `None` when
/// empty. A malformed body on a successful status is not a failure.
fn parse_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_owned())),
    }
}
