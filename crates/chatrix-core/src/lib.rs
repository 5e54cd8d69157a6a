//! Chatrix Core
//!
//! Bootstraps the chat widget inside the host page and wires it to the
//! parent frame. The widget itself is a collaborator: the shell hands it
//! configuration, the navigation admission policy and an [`EmbedContext`],
//! and keeps faults from ever reaching the default browser error surface.

mod config;
mod context;
mod error;
mod fetch;
mod shell;
mod widget;

use std::sync::OnceLock;

pub use config::{LaunchParams, ShellSettings};
pub use context::EmbedContext;
pub use error::CoreError;
pub use fetch::{ConfigFetcher, HttpConfigFetcher, WidgetConfig};
pub use shell::{Embedding, FaultGuard, Host, Shell};
pub use widget::{AdmissionPolicy, HostPage, RootElement, Widget, WidgetFactory, WidgetOptions};

// Re-export core components
pub use chatrix_bridge::{
    BridgeError, MemoryChannel, ParentChannel, ParentMessage, ParentNotifier,
    Result as BridgeResult, ResizeView, TARGET_ORIGIN,
};
pub use chatrix_diagnostics::{
    Classification, ConsentProvider, DiagnosticsError, Disposition, ExportOutcome, ExportReport,
    FaultEvent, FaultInterceptor, FaultKind, FaultSuppressor, FileSaver, FixedConsent,
    LogCollector, LogExportGate, LogSource, MemorySaver, Result as DiagnosticsResult,
    EXPORT_FILE_NAME, RESIZE_OBSERVER_LIMIT, RESIZE_OBSERVER_UNDELIVERED,
};
pub use chatrix_navigation::{
    allows_child, NavigationError, NavigationState, Position, ViewKind,
};

pub type Result<T> = std::result::Result<T, CoreError>;

static LOG_COLLECTOR: OnceLock<LogCollector> = OnceLock::new();

/// Initialize logging and return the collector backing log export.
///
/// Development builds get a disabled collector. Safe to call more than
/// once; later calls return the first collector.
pub fn init_logging(settings: &ShellSettings) -> LogCollector {
    LOG_COLLECTOR
        .get_or_init(|| {
            use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

            let collector = if settings.development {
                LogCollector::disabled()
            } else {
                LogCollector::new(settings.log_capacity)
            };

            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            // stdout goes nowhere in the browser, write to the devtools console
            #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .without_time()
                .with_writer(tracing_web::MakeWebConsoleWriter::new());
            #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
            let fmt_layer = fmt::layer().with_target(true);

            let result = tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(collector.clone())
                .try_init();
            if let Err(e) = result {
                tracing::debug!(error = %e, "Global subscriber already set");
            }

            collector
        })
        .clone()
}
