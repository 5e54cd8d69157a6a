//! Bridge error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to post message: {0}")]
    Post(String),

    #[error("Unknown view: {0}")]
    UnknownView(String),
}
