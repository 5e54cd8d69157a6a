//! Parent-frame notifier

use std::sync::Arc;

use crate::channel::ParentChannel;
use crate::message::{ParentMessage, ResizeView};

/// Receiving origin is not restricted at this layer
pub const TARGET_ORIGIN: &str = "*";

/// Emits status messages to the embedding page.
///
/// Every method is fire-and-forget: with no parent frame nothing happens,
/// and a failed post is logged and dropped.
#[derive(Clone, Default)]
pub struct ParentNotifier {
    channel: Option<Arc<dyn ParentChannel>>,
}

impl ParentNotifier {
    pub fn new(channel: Arc<dyn ParentChannel>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// Notifier for a page that is not embedded
    pub fn detached() -> Self {
        Self { channel: None }
    }

    pub fn from_channel(channel: Option<Arc<dyn ParentChannel>>) -> Self {
        Self { channel }
    }

    pub fn is_embedded(&self) -> bool {
        self.channel.is_some()
    }

    pub fn notify_view_change(&self, view: ResizeView) {
        self.send(ParentMessage::ResizeIframe { view });
    }

    pub fn notify_minimize(&self) {
        self.send(ParentMessage::Minimize);
    }

    /// Sent on every call, even when the count did not change
    pub fn notify_unread_count(&self, count: u32) {
        self.send(ParentMessage::UnreadMessage { count });
    }

    pub fn notify_error(&self) {
        self.send(ParentMessage::Error);
    }

    fn send(&self, message: ParentMessage) {
        let Some(channel) = &self.channel else {
            tracing::trace!(action = message.action(), "No parent frame, dropping message");
            return;
        };

        match channel.post_message(&message, TARGET_ORIGIN) {
            Ok(()) => tracing::debug!(action = message.action(), "Posted message to parent"),
            Err(e) => tracing::warn!(
                action = message.action(),
                error = %e,
                "Failed to post message to parent"
            ),
        }
    }
}

impl std::fmt::Debug for ParentNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParentNotifier")
            .field("embedded", &self.is_embedded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::error::BridgeError;

    struct BrokenChannel;

    impl ParentChannel for BrokenChannel {
        fn post_message(&self, _message: &ParentMessage, _target_origin: &str) -> crate::Result<()> {
            Err(BridgeError::Post("parent window is gone".to_string()))
        }
    }

    #[test]
    fn test_each_notification() {
        let channel = MemoryChannel::new();
        let notifier = ParentNotifier::new(Arc::new(channel.clone()));

        notifier.notify_view_change(ResizeView::Timeline);
        notifier.notify_minimize();
        notifier.notify_unread_count(7);
        notifier.notify_error();

        assert_eq!(
            channel.messages(),
            vec![
                ParentMessage::ResizeIframe {
                    view: ResizeView::Timeline
                },
                ParentMessage::Minimize,
                ParentMessage::UnreadMessage { count: 7 },
                ParentMessage::Error,
            ]
        );
        assert!(channel.origins().iter().all(|o| o == "*"));
    }

    #[test]
    fn test_unread_count_is_not_deduplicated() {
        let channel = MemoryChannel::new();
        let notifier = ParentNotifier::new(Arc::new(channel.clone()));

        notifier.notify_unread_count(5);
        notifier.notify_unread_count(5);

        let messages = channel.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], messages[1]);
    }

    #[test]
    fn test_detached_is_noop() {
        let notifier = ParentNotifier::detached();
        assert!(!notifier.is_embedded());

        notifier.notify_view_change(ResizeView::Login);
        notifier.notify_minimize();
        notifier.notify_unread_count(1);
        notifier.notify_error();
    }

    #[test]
    fn test_post_failure_is_swallowed() {
        let notifier = ParentNotifier::new(Arc::new(BrokenChannel));
        notifier.notify_error();
        notifier.notify_minimize();
    }
}
