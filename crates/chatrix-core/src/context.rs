//! Named capabilities handed to whatever owns the embedding boundary

use std::sync::Arc;

use chatrix_bridge::{ParentNotifier, ResizeView};
use chatrix_diagnostics::{ExportReport, FaultEvent, FaultSuppressor, LogExportGate};

/// Status notifications to the parent frame plus the log export trigger.
///
/// Cheap to clone; every clone drives the same notifier, gate and
/// suppressor.
#[derive(Clone)]
pub struct EmbedContext {
    notifier: ParentNotifier,
    export_gate: Arc<LogExportGate>,
    suppressor: Arc<FaultSuppressor>,
}

impl EmbedContext {
    pub fn new(
        notifier: ParentNotifier,
        export_gate: LogExportGate,
        suppressor: Arc<FaultSuppressor>,
    ) -> Self {
        Self {
            notifier,
            export_gate: Arc::new(export_gate),
            suppressor,
        }
    }

    pub fn notify_view_change(&self, view: ResizeView) {
        self.notifier.notify_view_change(view);
    }

    pub fn notify_minimize(&self) {
        self.notifier.notify_minimize();
    }

    pub fn notify_unread_count(&self, count: u32) {
        self.notifier.notify_unread_count(count);
    }

    pub fn notify_error(&self) {
        self.notifier.notify_error();
    }

    /// Run the consent-gated log export.
    ///
    /// A failed attempt is handed to the fault suppressor like any other
    /// unhandled rejection and yields `None`.
    pub async fn request_log_export(&self) -> Option<ExportReport> {
        match self.export_gate.request_log_export().await {
            Ok(report) => Some(report),
            Err(e) => {
                self.suppressor.handle(&FaultEvent::rejection(e.to_string()));
                None
            }
        }
    }

    pub fn suppressor(&self) -> &Arc<FaultSuppressor> {
        &self.suppressor
    }

    pub fn notifier(&self) -> &ParentNotifier {
        &self.notifier
    }
}

impl std::fmt::Debug for EmbedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedContext")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrix_bridge::{MemoryChannel, ParentMessage};
    use chatrix_diagnostics::{
        DiagnosticsError, ExportOutcome, FixedConsent, LogCollector, LogExport, LogSource,
        MemorySaver,
    };
    use futures_util::future::{FutureExt, LocalBoxFuture};

    struct UnreachableStore;

    impl LogSource for UnreachableStore {
        fn export(&self) -> LocalBoxFuture<'_, chatrix_diagnostics::Result<Option<LogExport>>> {
            futures_util::future::ready(Err(DiagnosticsError::Collection(
                "IndexedDB closed".to_string(),
            )))
            .boxed_local()
        }
    }

    fn context(logs: Arc<dyn LogSource>, saver: MemorySaver) -> (EmbedContext, MemoryChannel) {
        let channel = MemoryChannel::new();
        let notifier = ParentNotifier::new(Arc::new(channel.clone()));
        let suppressor = Arc::new(FaultSuppressor::new(notifier.clone()));
        let gate = LogExportGate::new(logs, Arc::new(FixedConsent::accepting()), Arc::new(saver));
        (EmbedContext::new(notifier, gate, suppressor), channel)
    }

    #[test]
    fn test_notifications_reach_parent() {
        let (context, channel) = context(Arc::new(LogCollector::new(4)), MemorySaver::new());

        context.notify_view_change(ResizeView::Settings);
        context.notify_minimize();
        context.notify_unread_count(2);
        context.notify_error();

        assert_eq!(
            channel.messages(),
            vec![
                ParentMessage::ResizeIframe {
                    view: ResizeView::Settings
                },
                ParentMessage::Minimize,
                ParentMessage::UnreadMessage { count: 2 },
                ParentMessage::Error,
            ]
        );
    }

    #[tokio::test]
    async fn test_log_export_through_context() {
        let saver = MemorySaver::new();
        let (context, channel) = context(Arc::new(LogCollector::new(4)), saver.clone());

        let report = context.request_log_export().await.unwrap();
        assert!(matches!(report.outcome, ExportOutcome::Exported { .. }));
        assert_eq!(saver.saved().len(), 1);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_collection_failure_is_reported_as_fault() {
        let saver = MemorySaver::new();
        let (context, channel) = context(Arc::new(UnreachableStore), saver.clone());

        assert!(context.request_log_export().await.is_none());
        assert!(saver.saved().is_empty());
        assert_eq!(channel.messages(), vec![ParentMessage::Error]);
    }
}
