//! Cross-document messaging channel

use parking_lot::Mutex;
use std::sync::Arc;

use crate::message::ParentMessage;
use crate::Result;

/// Posts messages to the window that embeds the widget.
///
/// Implementations exist only while a parent frame exists; a page that is
/// not embedded has no channel at all.
pub trait ParentChannel {
    fn post_message(&self, message: &ParentMessage, target_origin: &str) -> Result<()>;
}

/// In-process channel that records every post
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    posted: Arc<Mutex<Vec<(ParentMessage, String)>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages posted so far, in send order
    pub fn messages(&self) -> Vec<ParentMessage> {
        self.posted.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Target origins used for each post, in send order
    pub fn origins(&self) -> Vec<String> {
        self.posted.lock().iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.posted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posted.lock().is_empty()
    }
}

impl ParentChannel for MemoryChannel {
    fn post_message(&self, message: &ParentMessage, target_origin: &str) -> Result<()> {
        self.posted
            .lock()
            .push((message.clone(), target_origin.to_string()));
        Ok(())
    }
}
