pub mod api_client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod loader;
pub mod posts;
pub mod search;
pub mod ui_guard;

#[cfg(test)]
mod tests;

pub const API_HOSTNAME: &str = "v2.api.noroff.dev";
pub const DEFAULT_API_BASE_URL: &str = const_format::concatcp!("https://", API_HOSTNAME);

/// Vendor API-key header sent alongside the bearer token when a key is stored.
pub const API_KEY_HEADER: &str = "X-Noroff-API-Key";

/// Collection segment under which the post endpoints live.
pub const SOCIAL_COLLECTION: &str = "social";
