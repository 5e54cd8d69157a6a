//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("View '{child}' is not allowed under {parent}")]
    NotAllowed { parent: String, child: String },
}
