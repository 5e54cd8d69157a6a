//! Consent-gated log export
//!
//! 1. Collect logs from the [`LogSource`]
//! 2. No logs in a development build: warn and stop
//! 3. Ask the operator, disclosing what the logs contain
//! 4. Declined: stop
//! 5. Confirmed: save `chatterbox-logs.json` locally
//!
//! Nothing here touches the network.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::consent::{export_disclosure, ConsentProvider, DEFAULT_PRIVACY_POLICY_URL};
use crate::error::DiagnosticsError;
use crate::logs::LogSource;
use crate::saver::FileSaver;
use crate::Result;

pub const EXPORT_FILE_NAME: &str = "chatterbox-logs.json";
pub const EXPORT_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File handed to the saver
    Exported {
        file_name: String,
        size: usize,
        sha256: String,
    },
    /// Operator said no
    Declined,
    /// Log collection is not configured
    Unavailable,
}

/// Result of one export attempt
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub request_id: Uuid,
    pub outcome: ExportOutcome,
}

pub struct LogExportGate {
    logs: Arc<dyn LogSource>,
    consent: Arc<dyn ConsentProvider>,
    saver: Arc<dyn FileSaver>,
    development: bool,
    privacy_policy_url: String,
}

impl LogExportGate {
    pub fn new(
        logs: Arc<dyn LogSource>,
        consent: Arc<dyn ConsentProvider>,
        saver: Arc<dyn FileSaver>,
    ) -> Self {
        Self {
            logs,
            consent,
            saver,
            development: false,
            privacy_policy_url: DEFAULT_PRIVACY_POLICY_URL.to_string(),
        }
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn with_privacy_policy_url(mut self, url: impl Into<String>) -> Self {
        self.privacy_policy_url = url.into();
        self
    }

    /// Run one export attempt.
    ///
    /// Collection failures are returned as errors for the caller to route
    /// into fault handling.
    pub async fn request_log_export(&self) -> Result<ExportReport> {
        let request_id = Uuid::new_v4();
        let logs = self.logs.export().await?;

        if logs.is_none() && self.development {
            tracing::warn!(
                request_id = %request_id,
                "Development build is not collecting persistent logs; \
                 run a release build or disable the development flag to export logs"
            );
            return Ok(ExportReport {
                request_id,
                outcome: ExportOutcome::Unavailable,
            });
        }

        let prompt = export_disclosure(&self.privacy_policy_url);
        if !self.consent.confirm(&prompt) {
            tracing::info!(request_id = %request_id, "Log export declined");
            return Ok(ExportReport {
                request_id,
                outcome: ExportOutcome::Declined,
            });
        }

        let logs = logs.ok_or(DiagnosticsError::NoLogs)?;
        let bytes = logs.to_bytes()?;
        let size = bytes.len();
        let sha256 = format!("{:x}", Sha256::digest(&bytes));

        self.saver
            .save_file_as(bytes, EXPORT_MIME_TYPE, EXPORT_FILE_NAME)?;

        tracing::info!(
            request_id = %request_id,
            records = logs.records().len(),
            size,
            sha256 = %sha256,
            "Exported logs"
        );

        Ok(ExportReport {
            request_id,
            outcome: ExportOutcome::Exported {
                file_name: EXPORT_FILE_NAME.to_string(),
                size,
                sha256,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::FixedConsent;
    use crate::logs::{LogCollector, LogExport, LogRecord};
    use crate::saver::MemorySaver;
    use chatrix_bridge::{MemoryChannel, ParentNotifier};
    use futures_util::future::{FutureExt, LocalBoxFuture};
    use tracing_subscriber::layer::SubscriberExt;

    struct FailingSource;

    impl LogSource for FailingSource {
        fn export(&self) -> LocalBoxFuture<'_, Result<Option<LogExport>>> {
            futures_util::future::ready(Err(DiagnosticsError::Collection(
                "log store unavailable".to_string(),
            )))
            .boxed_local()
        }
    }

    fn collector_with_logs() -> LogCollector {
        let collector = LogCollector::new(8);
        collector.push(LogRecord {
            timestamp: chrono::Utc::now(),
            level: "INFO".to_string(),
            target: "chatrix".to_string(),
            message: "Widget started".to_string(),
            fields: Default::default(),
        });
        collector
    }

    #[tokio::test]
    async fn test_confirmed_export_saves_one_file() {
        let saver = MemorySaver::new();
        let consent = FixedConsent::accepting();
        let gate = LogExportGate::new(
            Arc::new(collector_with_logs()),
            Arc::new(consent.clone()),
            Arc::new(saver.clone()),
        );

        let report = gate.request_log_export().await.unwrap();

        let saved = saver.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].file_name, "chatterbox-logs.json");
        assert_eq!(saved[0].mime_type, EXPORT_MIME_TYPE);
        assert_eq!(consent.prompts().len(), 1);

        match report.outcome {
            ExportOutcome::Exported { file_name, size, sha256 } => {
                assert_eq!(file_name, EXPORT_FILE_NAME);
                assert_eq!(size, saved[0].contents.len());
                assert_eq!(sha256.len(), 64);
            }
            other => panic!("Expected Exported, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_declined_export_saves_nothing() {
        let saver = MemorySaver::new();
        let gate = LogExportGate::new(
            Arc::new(collector_with_logs()),
            Arc::new(FixedConsent::declining()),
            Arc::new(saver.clone()),
        );

        let report = gate.request_log_export().await.unwrap();
        assert_eq!(report.outcome, ExportOutcome::Declined);
        assert!(saver.saved().is_empty());
    }

    #[tokio::test]
    async fn test_development_without_logs_warns_once() {
        let capture = LogCollector::new(32);
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(capture.clone()),
        );

        let saver = MemorySaver::new();
        let consent = FixedConsent::accepting();
        let channel = MemoryChannel::new();
        // Held only to show the export flow never reaches the parent frame
        let _notifier = ParentNotifier::new(Arc::new(channel.clone()));

        let gate = LogExportGate::new(
            Arc::new(LogCollector::disabled()),
            Arc::new(consent.clone()),
            Arc::new(saver.clone()),
        )
        .with_development(true);

        let report = gate.request_log_export().await.unwrap();
        assert_eq!(report.outcome, ExportOutcome::Unavailable);
        assert!(saver.saved().is_empty());
        assert!(consent.prompts().is_empty());
        assert!(channel.is_empty());

        let warnings = capture
            .snapshot()
            .unwrap()
            .records()
            .iter()
            .filter(|r| r.level == "WARN")
            .count();
        assert_eq!(warnings, 1);
    }

    #[tokio::test]
    async fn test_release_without_logs_fails_after_consent() {
        let saver = MemorySaver::new();
        let gate = LogExportGate::new(
            Arc::new(LogCollector::disabled()),
            Arc::new(FixedConsent::accepting()),
            Arc::new(saver.clone()),
        );

        let err = gate.request_log_export().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::NoLogs));
        assert!(saver.saved().is_empty());
    }

    #[tokio::test]
    async fn test_collection_failure_propagates() {
        let consent = FixedConsent::accepting();
        let gate = LogExportGate::new(
            Arc::new(FailingSource),
            Arc::new(consent.clone()),
            Arc::new(MemorySaver::new()),
        );

        let err = gate.request_log_export().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::Collection(_)));
        assert!(consent.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_custom_privacy_policy_url() {
        let consent = FixedConsent::declining();
        let gate = LogExportGate::new(
            Arc::new(collector_with_logs()),
            Arc::new(consent.clone()),
            Arc::new(MemorySaver::new()),
        )
        .with_privacy_policy_url("https://chat.example.org/privacy");

        gate.request_log_export().await.unwrap();
        assert!(consent.prompts()[0].contains("https://chat.example.org/privacy"));
    }
}
