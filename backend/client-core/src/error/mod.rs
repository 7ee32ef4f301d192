pub mod api;
pub mod config;

pub use api::ApiError;
pub use config::ConfigError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
