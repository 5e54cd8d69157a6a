//! Chatrix Navigation
//!
//! Decides which widget views are reachable from the embedding page:
//! - Top level: `start`, `login`, `settings`, `timeline`, `minimize`
//! - Nested views: never admitted
//!
//! The widget's own router consults [`allows_child`] for every segment it
//! wants to open, so the embedding keeps the widget on a flat set of screens.

mod error;
mod policy;
mod view;

pub use error::NavigationError;
pub use policy::{allows_child, Position, TOP_LEVEL_VIEWS};
pub use view::{NavigationState, ViewKind};

pub type Result<T> = std::result::Result<T, NavigationError>;
