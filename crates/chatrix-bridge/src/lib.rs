//! Chatrix Parent-Frame Bridge
//!
//! The only channel through which the embedding page learns about the
//! widget. Four one-way messages, posted with target origin `*`:
//! - `{action: "resize-iframe", view}` when the visible view changes
//! - `{action: "minimize"}` when the widget collapses
//! - `{action: "unread-message", count}` on every unread count update
//! - `{action: "error"}` when the widget hit a genuine fault
//!
//! There is no inbound command channel.

mod channel;
mod error;
mod message;
mod notifier;

pub use channel::{MemoryChannel, ParentChannel};
pub use error::BridgeError;
pub use message::{ParentMessage, ResizeView};
pub use notifier::{ParentNotifier, TARGET_ORIGIN};

pub type Result<T> = std::result::Result<T, BridgeError>;
