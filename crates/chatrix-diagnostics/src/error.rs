//! Diagnostics error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("Log collection failed: {0}")]
    Collection(String),

    #[error("No logs available to export")]
    NoLogs,

    #[error("Failed to save file: {0}")]
    Save(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Fault handler already installed")]
    AlreadyInstalled,

    #[error("Failed to install fault handler: {0}")]
    Install(String),
}
