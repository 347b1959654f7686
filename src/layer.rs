use crate::engine::Logger;
use crate::level::Level;
use crate::record::{Fields, LogRecord};
use crate::settings;
use chrono::Local;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that writes `tracing` events through a
/// facade [`Logger`].
///
/// Every event at or above the process-wide threshold becomes one record
/// carrying the logger's bound fields, the event fields and, when the logger
/// records callers, the event's `file:line` rendered by the installed caller
/// formatter.
///
/// The threshold is checked in `on_event`, not `enabled`: `tracing` caches
/// `enabled` per callsite and the threshold can change at runtime.
pub struct FacadeLayer {
    logger: Logger,
    /// Events written to the logger's sink.
    pub written_events: Arc<AtomicU64>,
}

impl FacadeLayer {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            written_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<S> Layer<S> for FacadeLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Level::from(*meta.level());
        if level < settings::global_level() {
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let caller = if self.logger.caller_enabled() {
            meta.file()
                .zip(meta.line())
                .map(|(file, line)| (settings::current().caller_formatter)(file, line))
        } else {
            None
        };

        self.logger.write(LogRecord {
            timestamp: Local::now(),
            level,
            fields,
            caller,
            message,
        });
        self.written_events.fetch_add(1, Ordering::Relaxed);
    }
}

/// Collects `tracing` event fields into record fields. The `message`
/// field becomes the record message.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields.insert(field.name().to_string(), Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{value:?}"));
        } else {
            self.fields.insert(field.name().to_string(), Value::String(format!("{value:?}")));
        }
    }
}
