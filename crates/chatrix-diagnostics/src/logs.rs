//! Log capture
//!
//! [`LogCollector`] is a `tracing` layer that keeps the most recent records
//! in a bounded ring buffer. Development builds run it disabled, which is
//! how the export flow learns that no persistent logs exist.

use chrono::{DateTime, Utc};
use futures_util::future::{FutureExt, LocalBoxFuture};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::Result;

const EXPORT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Snapshot of captured records, ready to be written out
#[derive(Debug, Clone)]
pub struct LogExport {
    records: Vec<LogRecord>,
    exported_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    format_version: u32,
    exported_at: &'a DateTime<Utc>,
    items: &'a [LogRecord],
}

impl LogExport {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self {
            records,
            exported_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize into the JSON document that gets saved
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let document = ExportDocument {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at: &self.exported_at,
            items: &self.records,
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}

/// Something that can hand over the accumulated logs.
///
/// `Ok(None)` means log collection is not configured.
pub trait LogSource {
    fn export(&self) -> LocalBoxFuture<'_, Result<Option<LogExport>>>;
}

#[derive(Clone)]
pub struct LogCollector {
    buffer: Option<Arc<Mutex<VecDeque<LogRecord>>>>,
    capacity: usize,
}

impl LogCollector {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Some(Arc::new(Mutex::new(VecDeque::with_capacity(capacity)))),
            capacity,
        }
    }

    /// Collector that keeps nothing and exports nothing
    pub fn disabled() -> Self {
        Self {
            buffer: None,
            capacity: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn len(&self) -> usize {
        self.buffer.as_ref().map(|b| b.lock().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a record, evicting the oldest once full
    pub fn push(&self, record: LogRecord) {
        let Some(buffer) = &self.buffer else {
            return;
        };

        let mut buffer = buffer.lock();
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(record);
    }

    pub fn snapshot(&self) -> Option<LogExport> {
        self.buffer
            .as_ref()
            .map(|b| LogExport::new(b.lock().iter().cloned().collect()))
    }
}

impl fmt::Debug for LogCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCollector")
            .field("enabled", &self.is_enabled())
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl LogSource for LogCollector {
    fn export(&self) -> LocalBoxFuture<'_, Result<Option<LogExport>>> {
        futures_util::future::ready(Ok(self.snapshot())).boxed_local()
    }
}

impl<S: Subscriber> Layer<S> for LogCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.is_enabled() {
            return;
        }

        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        self.push(LogRecord {
            timestamp: Utc::now(),
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}
