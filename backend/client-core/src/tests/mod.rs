mod config;
mod credentials;
mod posts;
mod search;
