use crate::level::Level;
use crate::record::{to_value, Fields, LogRecord};
use crate::settings;
use crate::sink::LogSink;
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Key under which [`Event::err`] stores the error text.
pub const ERROR_FIELD: &str = "error";

/// Structured logging engine handle.
///
/// A `Logger` is an immutable value: a shared sink, the context fields bound
/// to it and whether call sites are recorded. Deriving a logger with
/// [`Logger::with_field`] and friends clones the context, so derived loggers
/// never affect their parent and can be used from any thread.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    context: Arc<Fields>,
    caller: bool,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            context: Arc::new(Fields::new()),
            caller: false,
        }
    }

    /// Derived logger carrying `key = value` on every record.
    pub fn with_field<V>(&self, key: impl Into<String>, value: &V) -> Logger
    where
        V: Serialize + ?Sized,
    {
        let mut derived = self.clone();
        Arc::make_mut(&mut derived.context).insert(key.into(), to_value(value));
        derived
    }

    /// Derived logger carrying all of `fields` on every record.
    pub fn with_fields(&self, fields: &Fields) -> Logger {
        let mut derived = self.clone();
        if !fields.is_empty() {
            let context = Arc::make_mut(&mut derived.context);
            for (key, value) in fields {
                context.insert(key.clone(), value.clone());
            }
        }
        derived
    }

    /// Derived logger recording the call site of every event.
    pub fn with_caller(&self) -> Logger {
        Logger {
            caller: true,
            ..self.clone()
        }
    }

    pub fn context(&self) -> &Fields {
        &self.context
    }

    pub fn caller_enabled(&self) -> bool {
        self.caller
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Start an event at `level`.
    ///
    /// The event is inert when `level` is below the process-wide threshold.
    /// Nothing is written until [`Event::msg`] or [`Event::send`] is called.
    #[track_caller]
    pub fn event(&self, level: Level) -> Event {
        if level < settings::global_level() {
            return Event { level, inner: None };
        }
        let caller = if self.caller {
            Some(Location::caller())
        } else {
            None
        };
        Event {
            level,
            inner: Some(Box::new(EventInner {
                sink: Arc::clone(&self.sink),
                fields: (*self.context).clone(),
                caller,
            })),
        }
    }

    #[track_caller]
    pub fn trace(&self) -> Event {
        self.event(Level::Trace)
    }

    #[track_caller]
    pub fn debug(&self) -> Event {
        self.event(Level::Debug)
    }

    #[track_caller]
    pub fn info(&self) -> Event {
        self.event(Level::Info)
    }

    #[track_caller]
    pub fn warn(&self) -> Event {
        self.event(Level::Warn)
    }

    #[track_caller]
    pub fn error(&self) -> Event {
        self.event(Level::Error)
    }

    #[track_caller]
    pub fn fatal(&self) -> Event {
        self.event(Level::Fatal)
    }

    #[track_caller]
    pub fn panic(&self) -> Event {
        self.event(Level::Panic)
    }

    /// Encode and write a record built outside of [`Event`], e.g. by the
    /// `tracing` bridge. The context fields of this logger are prepended.
    pub fn write(&self, mut record: LogRecord) {
        if !self.context.is_empty() {
            let mut fields = (*self.context).clone();
            fields.append(&mut record.fields);
            record.fields = fields;
        }
        dispatch(self.sink.as_ref(), &record);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}

fn dispatch(sink: &dyn LogSink, record: &LogRecord) {
    let settings = settings::current();
    let line = record.to_line(&settings.names, settings.time_format);
    // Reporting through `tracing` could loop back into this sink when the
    // bridge layer is installed.
    if let Err(e) = sink.write_line(&line) {
        eprintln!("failed to write log record: {e}");
    }
}

struct EventInner {
    sink: Arc<dyn LogSink>,
    fields: Fields,
    caller: Option<&'static Location<'static>>,
}

/// An open structured record.
///
/// Fields are appended with the typed setters and the record is written by
/// [`Event::msg`] or [`Event::send`]. Dropping an event without finishing it
/// discards it. Events below the threshold accept every call and write
/// nothing, except that `fatal` and `panic` events still end the process or
/// the thread when finished.
#[must_use = "an event is written only once `msg` or `send` is called"]
pub struct Event {
    level: Level,
    inner: Option<Box<EventInner>>,
}

impl Event {
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether finishing this event writes a record.
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    fn put(mut self, key: &str, value: impl FnOnce() -> Value) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            inner.fields.insert(key.to_string(), value());
        }
        self
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.put(key, || Value::from(value))
    }

    pub fn int(self, key: &str, value: i64) -> Self {
        self.put(key, || Value::from(value))
    }

    pub fn uint(self, key: &str, value: u64) -> Self {
        self.put(key, || Value::from(value))
    }

    /// Non-finite values are written as `null`.
    pub fn float(self, key: &str, value: f64) -> Self {
        self.put(key, || Value::from(value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.put(key, || Value::from(value))
    }

    /// Any serializable value, stored as its JSON representation.
    pub fn field<V>(self, key: &str, value: &V) -> Self
    where
        V: Serialize + ?Sized,
    {
        self.put(key, || to_value(value))
    }

    pub fn fields(mut self, fields: &Fields) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            for (key, value) in fields {
                inner.fields.insert(key.clone(), value.clone());
            }
        }
        self
    }

    /// Store the error's display text under [`ERROR_FIELD`].
    pub fn err(self, err: &(dyn std::error::Error + 'static)) -> Self {
        self.put(ERROR_FIELD, || Value::from(err.to_string()))
    }

    /// Finish the event with `message`.
    pub fn msg(self, message: impl fmt::Display) {
        let message = message.to_string();
        self.finish(Some(message));
    }

    /// Finish the event without a message.
    pub fn send(self) {
        self.finish(None);
    }

    fn finish(self, message: Option<String>) {
        let Event { level, inner } = self;
        if let Some(inner) = inner {
            let EventInner {
                sink,
                fields,
                caller,
            } = *inner;
            let caller = caller.map(|location| {
                let formatter = settings::current().caller_formatter;
                formatter(location.file(), location.line())
            });
            let record = LogRecord {
                timestamp: Local::now(),
                level,
                fields,
                caller,
                message: message.clone(),
            };
            dispatch(sink.as_ref(), &record);
            if level >= Level::Fatal {
                if let Err(e) = sink.flush() {
                    eprintln!("failed to flush log sink: {e}");
                }
            }
        }

        match level {
            Level::Fatal => std::process::exit(1),
            Level::Panic => panic!("{}", message.unwrap_or_default()),
            _ => {}
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("fields", &self.inner.as_ref().map(|inner| &inner.fields))
            .finish()
    }
}
