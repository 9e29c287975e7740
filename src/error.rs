use thiserror::Error;

use crate::config::ConfigurationError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ItemsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ItemsError>;
