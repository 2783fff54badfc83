//! Log sink and the bridge handler forwarding records to the tracing backend
//!
//! The sink is an explicitly constructed, explicitly owned object: attaching it
//! installs a [`tracing_subscriber::Layer`] that forwards every matching event
//! to a [`Backend`], and returns an RAII guard that releases the handler and
//! flushes the backend when dropped. No ambient global state is required in
//! the default (scoped) attachment mode.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::dispatcher::{self, DefaultGuard};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

use crate::cli::{AttachMode, RecordFormat};
use crate::record::{Record, Severity};

/// Errors attaching the bridge handler to the process
#[derive(Error, Debug)]
pub enum AttachError {
    #[error("failed to attach bridge handler globally: {0}")]
    GlobalAlreadySet(String),
}

/// Destination for forwarded records.
///
/// The shipped binary forwards to stdout via [`StreamBackend`]; in-process
/// harnesses can substitute [`MemoryBackend`] or their own implementation.
/// One `forward` call per emitted record, in emission order.
pub trait Backend: Send + Sync {
    fn forward(&self, record: Record);
    fn flush(&self);
}

/// Backend writing one line per record to stdout
pub struct StreamBackend {
    format: RecordFormat,
}

impl StreamBackend {
    pub fn stdout(format: RecordFormat) -> Self {
        Self { format }
    }
}

impl Backend for StreamBackend {
    fn forward(&self, record: Record) {
        let line = match self.format {
            RecordFormat::Text => record.render_text(),
            RecordFormat::Json => match record.to_json() {
                Ok(line) => line,
                Err(_) => return,
            },
        };
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }

    fn flush(&self) {
        let _ = io::stdout().lock().flush();
    }
}

/// Backend capturing records in memory, for harnesses and tests
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<Record>>,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records observed so far, in emission order
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().expect("record lock poisoned").clone()
    }
}

impl Backend for MemoryBackend {
    fn forward(&self, record: Record) {
        self.records.lock().expect("record lock poisoned").push(record);
    }

    fn flush(&self) {}
}

/// A named logging channel with a severity threshold and an owned backend
pub struct LogSink {
    name: &'static str,
    threshold: Level,
    backend: Arc<dyn Backend>,
}

impl LogSink {
    pub fn new(name: &'static str, threshold: Level, backend: Arc<dyn Backend>) -> Self {
        Self {
            name,
            threshold,
            backend,
        }
    }

    /// Attach the bridge handler.
    ///
    /// `Scoped` installs the handler as the default dispatcher for the
    /// current scope and hands the release back to the returned guard.
    /// `Global` installs it process-wide; attaching over an already
    /// installed dispatcher is fatal.
    pub fn attach(self, mode: AttachMode) -> Result<AttachedSink, AttachError> {
        let backend = Arc::clone(&self.backend);
        let layer = BridgeLayer {
            channel: self.name,
            threshold: self.threshold,
            backend: self.backend,
        };
        let dispatch = Dispatch::new(Registry::default().with(layer));

        let guard = match mode {
            AttachMode::Scoped => Some(dispatcher::set_default(&dispatch)),
            AttachMode::Global => {
                dispatcher::set_global_default(dispatch)
                    .map_err(|e| AttachError::GlobalAlreadySet(e.to_string()))?;
                None
            }
        };

        Ok(AttachedSink {
            backend,
            _guard: guard,
        })
    }
}

/// Guard over an attached sink: dropping it releases the handler and
/// flushes the backend, on every exit path.
pub struct AttachedSink {
    backend: Arc<dyn Backend>,
    _guard: Option<DefaultGuard>,
}

impl Drop for AttachedSink {
    fn drop(&mut self) {
        // Events are forwarded synchronously, so flushing here guarantees the
        // backend has observed every prior emission before the handler detaches.
        self.backend.flush();
    }
}

/// The bridge: forwards each event on the sink's channel at or above the
/// threshold to the backend as a [`Record`]
struct BridgeLayer {
    channel: &'static str,
    threshold: Level,
    backend: Arc<dyn Backend>,
}

impl<S: Subscriber> Layer<S> for BridgeLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        metadata.target() == self.channel && *metadata.level() <= self.threshold
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.backend.forward(Record {
            level: Severity::from(event.metadata().level()),
            target: event.metadata().target().to_string(),
            message: visitor.message,
        });
    }
}

/// Pulls the `message` field out of an event
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}
