mod api_client;
mod helpers;
mod posts;
mod search;
