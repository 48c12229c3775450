use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::Teavet;
use crate::record::{absolute_source_path, LogRecord};

/// `tracing_subscriber` layer that turns events into [`LogRecord`]s and
/// appends them to the logger's file.
///
/// Writes happen inline on the emitting thread. The layer never prints and
/// never terminates; console output is left to whatever other layers are
/// installed. Events with [`crate::DIAGNOSTICS_TARGET`] are skipped.
pub struct TeavetLayer {
    logger: Arc<Teavet>,
    min_level: Level,
    /// Records successfully appended.
    pub persisted_events: Arc<AtomicU64>,
    /// Records that could not be appended.
    pub failed_events: Arc<AtomicU64>,
}

impl TeavetLayer {
    /// Capture events at `min_level` or more severe.
    pub fn new(logger: Arc<Teavet>, min_level: Level) -> Self {
        Self {
            logger,
            min_level,
            persisted_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<S> Layer<S> for TeavetLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.min_level || meta.target() == crate::DIAGNOSTICS_TARGET {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let filename = meta
            .file()
            .map(absolute_source_path)
            .unwrap_or_else(|| meta.target().to_string());

        let mut record = LogRecord::new(filename, meta.line().unwrap_or(0))
            .with_status(status_label(meta.level()))
            .with_message(visitor.message_line());
        if let Some(fault) = visitor.fault {
            record = record.with_fault(fault);
        }

        match self.logger.persist(&record) {
            Ok(_) => {
                self.persisted_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("unable to persist tracing event: {}", e);
            }
        }
    }
}

fn status_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "error",
        Level::WARN => "warning",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        _ => "trace",
    }
}

/// Collects the `message` field, an `error`/`fault` field, and every other
/// field as `key=value`.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fault: Option<String>,
    extra: Vec<(&'static str, String)>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "error" | "fault" => self.fault = Some(value),
            name => self.extra.push((name, value)),
        }
    }

    fn message_line(&self) -> String {
        let mut line = self.message.clone().unwrap_or_default();
        for (name, value) in &self.extra {
            if !line.is_empty() {
                line.push(' ');
            }
            let _ = write!(line, "{}={}", name, value);
        }
        line
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeavetConfig;
    use crate::persist::read_records;
    use crate::test_support::SharedBuf;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn setup(min_level: Level) -> (tempfile::TempDir, Arc<Teavet>, TeavetLayer) {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(Teavet::with_console_writer(
            TeavetConfig::default().with_log_dir(dir.path()),
            SharedBuf::default(),
        ));
        logger.start().unwrap();
        let layer = TeavetLayer::new(Arc::clone(&logger), min_level);
        (dir, logger, layer)
    }

    #[test]
    fn persists_events_at_or_above_min_level() {
        let (_dir, logger, layer) = setup(Level::WARN);
        let persisted = Arc::clone(&layer.persisted_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not persisted");
            tracing::warn!(attempt = 3, "retrying upload");
            tracing::error!(error = "connection reset", "upload failed");
        });

        assert_eq!(persisted.load(Ordering::Relaxed), 2);
        let records = read_records(&logger.log_file().unwrap()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].status(), Some("warning"));
        assert_eq!(records[0].message(), Some("retrying upload attempt=3"));
        assert!(records[0].filename().ends_with("layer.rs"));

        assert_eq!(records[1].status(), Some("error"));
        assert_eq!(records[1].message(), Some("upload failed"));
        assert_eq!(records[1].fault(), Some("connection reset"));
    }

    #[test]
    fn failures_are_counted_not_raised() {
        let (dir, _logger, layer) = setup(Level::ERROR);
        let failed = Arc::clone(&layer.failed_events);
        std::fs::remove_file(dir.path().join("teavet.log")).unwrap();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("nowhere to go");
        });

        assert_eq!(failed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn only_the_diagnostics_target_is_skipped() {
        let (_dir, logger, layer) = setup(Level::TRACE);
        let persisted = Arc::clone(&layer.persisted_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "teavet::diagnostics", "internal detail");
            tracing::error!(target: "teavet::other", "kept");
        });

        // Persisting "kept" emits a diagnostics trace event of its own; it
        // must not come back as a second record.
        assert_eq!(persisted.load(Ordering::Relaxed), 1);
        let records = read_records(&logger.log_file().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message(), Some("kept"));
    }

    #[test]
    fn visitor_joins_extra_fields() {
        let mut visitor = FieldVisitor::default();
        visitor.extra.push(("user_id", "42".to_string()));
        assert_eq!(visitor.message_line(), "user_id=42");

        visitor.message = Some("login".to_string());
        assert_eq!(visitor.message_line(), "login user_id=42");
    }
}
