//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] chatrix_bridge::BridgeError),

    #[error("Diagnostics error: {0}")]
    Diagnostics(#[from] chatrix_diagnostics::DiagnosticsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page URL does not have a 'config' parameter")]
    MissingConfigParam,

    #[error("No element matching '{0}' found")]
    MissingRoot(String),

    #[error("Invalid widget configuration: {0}")]
    InvalidConfig(String),

    #[error("Host page error: {0}")]
    Host(String),

    #[error("Widget error: {0}")]
    Widget(String),

    #[error("Shell already started")]
    AlreadyStarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err = CoreError::from(chatrix_diagnostics::DiagnosticsError::AlreadyInstalled);
        assert_eq!(
            err.to_string(),
            "Diagnostics error: Fault handler already installed"
        );

        let err = CoreError::from(chatrix_bridge::BridgeError::Post("detached".to_string()));
        assert!(matches!(err, CoreError::Bridge(_)));
    }
}
