//! Chatrix Diagnostics
//!
//! - In-memory log capture as a `tracing` layer
//! - Log export gated on explicit user consent, saved locally only
//! - Page-wide fault suppression: benign noise is swallowed, genuine
//!   faults are logged and reported to the parent frame as `error`

mod consent;
mod error;
mod export;
mod fault;
mod logs;
mod saver;

pub use consent::{export_disclosure, ConsentProvider, FixedConsent, DEFAULT_PRIVACY_POLICY_URL};
pub use error::DiagnosticsError;
pub use export::{ExportOutcome, ExportReport, LogExportGate, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
pub use fault::{
    Classification, Disposition, FaultEvent, FaultInterceptor, FaultKind, FaultSuppressor,
    RESIZE_OBSERVER_LIMIT, RESIZE_OBSERVER_UNDELIVERED,
};
pub use logs::{LogCollector, LogExport, LogRecord, LogSource};
pub use saver::{FileSaver, MemorySaver, SavedFile};

pub type Result<T> = std::result::Result<T, DiagnosticsError>;
