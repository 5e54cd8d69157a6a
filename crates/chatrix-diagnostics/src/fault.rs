//! Page-wide fault suppression
//!
//! Every uncaught error and unhandled rejection on the page ends here.
//! Known noise is swallowed; anything else is logged, reported to the
//! parent frame as a bare `error`, and kept away from the default browser
//! error surface so the embedding page decides what the user sees.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chatrix_bridge::ParentNotifier;

use crate::error::DiagnosticsError;
use crate::Result;

pub const RESIZE_OBSERVER_UNDELIVERED: &str =
    "ResizeObserver loop completed with undelivered notifications.";
pub const RESIZE_OBSERVER_LIMIT: &str = "ResizeObserver loop limit exceeded";

// The widget renders <img> without a source while media is being decrypted
const TOLERATED_TARGET_TAG: &str = "IMG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// Uncaught synchronous error
    Error,
    /// Promise rejected with nobody listening
    UnhandledRejection,
    /// Rust panic inside the shell
    Panic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Benign,
    Genuine,
}

/// What the interceptor must do with the originating event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    /// Stop every other listener from seeing the event
    pub stop_propagation: bool,
    /// Suppress the default browser handling
    pub prevent_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultEvent {
    pub kind: FaultKind,
    /// Event message text (absent on rejections)
    pub message: Option<String>,
    /// Tag name of the element the event came from, if any
    pub target_tag: Option<String>,
    /// Rendered error or rejection reason
    pub detail: Option<String>,
}

impl FaultEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Error,
            message: Some(message.into()),
            target_tag: None,
            detail: None,
        }
    }

    pub fn rejection(reason: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::UnhandledRejection,
            message: None,
            target_tag: None,
            detail: Some(reason.into()),
        }
    }

    /// Build from a panic payload and its location
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<String>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Box<dyn Any>".to_string());

        let detail = match location {
            Some(location) => format!("panicked at {location}: {message}"),
            None => format!("panicked: {message}"),
        };

        Self {
            kind: FaultKind::Panic,
            message: Some(message),
            target_tag: None,
            detail: Some(detail),
        }
    }

    pub fn with_target(mut self, tag_name: impl Into<String>) -> Self {
        self.target_tag = Some(tag_name.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn classify(&self) -> Classification {
        let noisy_message = matches!(
            self.message.as_deref(),
            Some(RESIZE_OBSERVER_UNDELIVERED) | Some(RESIZE_OBSERVER_LIMIT)
        );
        let tolerated_target = self
            .target_tag
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(TOLERATED_TARGET_TAG));

        if noisy_message || tolerated_target {
            Classification::Benign
        } else {
            Classification::Genuine
        }
    }
}

/// Hooks the suppressor into the host's error and rejection events.
///
/// Implementations must register in capture phase, ahead of any other
/// page-level listener, and must honor the returned [`Disposition`].
pub trait FaultInterceptor {
    fn intercept(&self, suppressor: Arc<FaultSuppressor>) -> Result<()>;
}

#[derive(Debug)]
pub struct FaultSuppressor {
    notifier: ParentNotifier,
    installed: AtomicBool,
}

impl FaultSuppressor {
    pub fn new(notifier: ParentNotifier) -> Self {
        Self {
            notifier,
            installed: AtomicBool::new(false),
        }
    }

    /// Register with the host. Only the first call may succeed.
    pub fn install(self: &Arc<Self>, interceptor: &dyn FaultInterceptor) -> Result<()> {
        if self
            .installed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DiagnosticsError::AlreadyInstalled);
        }

        if let Err(e) = interceptor.intercept(Arc::clone(self)) {
            self.installed.store(false, Ordering::SeqCst);
            return Err(e);
        }

        tracing::debug!("Fault suppressor installed");
        Ok(())
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    pub fn handle(&self, event: &FaultEvent) -> Disposition {
        match event.classify() {
            Classification::Benign => {
                tracing::trace!(kind = ?event.kind, "Suppressed benign fault");
                Disposition {
                    stop_propagation: true,
                    prevent_default: true,
                }
            }
            Classification::Genuine => {
                tracing::error!(
                    kind = ?event.kind,
                    reason = event
                        .detail
                        .as_deref()
                        .or(event.message.as_deref())
                        .unwrap_or("unknown"),
                    "Unhandled fault, hiding widget"
                );
                self.notifier.notify_error();
                Disposition {
                    stop_propagation: false,
                    prevent_default: true,
                }
            }
        }
    }
}
