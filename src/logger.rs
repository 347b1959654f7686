use crate::caller::short_caller;
use crate::engine::{Event, Logger};
use crate::error::LogError;
use crate::level::Level;
use crate::options::{LogOption, LogOptions};
use crate::record::{FieldNames, Fields, TimeFormat};
use crate::settings;
use crate::sink::{LogSink, RollingFileSink};
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;

/// Leveled logger writing JSON lines to a rolling file.
///
/// Built once from a list of [`LogOption`]s and then shared freely: every
/// emission derives its own [`Logger`], so concurrent calls never see each
/// other's prefix fields.
///
/// ```no_run
/// use ezlog::{fields, options::*, Log};
///
/// let log = Log::new([
///     with_output_file_path("./logs", "api"),
///     with_level_debug(),
///     with_caller(),
///     with_global_prefix(fields! { "service" => "api" }),
/// ])?;
///
/// log.info().str("route", "/health").msg("ok");
/// log.warn_with(&fields! { "user_id" => 42 }).msg("slow request");
/// # Ok::<(), ezlog::LogError>(())
/// ```
#[derive(Debug)]
pub struct Log {
    logger: Logger,
    options: LogOptions,
    created_at: DateTime<Local>,
}

impl Log {
    /// Apply `options` over the defaults and open the rolling file.
    ///
    /// **Effects**
    ///
    /// Writes the process-wide level threshold, time format and field names,
    /// and installs the short caller formatter when caller annotation is
    /// enabled. These settings are shared with every other `Log` in the
    /// process; the last one constructed wins.
    ///
    /// **Errors**
    /// - [`LogError::CreateDir`] / [`LogError::OpenSink`] when the log file
    ///   cannot be prepared.
    pub fn new<I>(options: I) -> Result<Self, LogError>
    where
        I: IntoIterator<Item = LogOption>,
    {
        Self::from_options(LogOptions::from_options(options))
    }

    /// Build from an already resolved [`LogOptions`], e.g. one loaded from
    /// an application config file.
    pub fn from_options(options: LogOptions) -> Result<Self, LogError> {
        let sink = RollingFileSink::open(&options)?;
        Ok(Self::with_sink(options, Arc::new(sink)))
    }

    /// Build on top of a caller supplied sink instead of the rolling file.
    /// The output path and rotation options are ignored.
    pub fn with_sink(options: LogOptions, sink: Arc<dyn LogSink>) -> Self {
        apply_global_settings(&options);

        let mut logger = Logger::new(sink).with_fields(&options.global_prefix);
        if options.caller {
            logger = logger.with_caller();
        }

        let log_file = options.log_file();
        tracing::debug!(
            threshold = %options.level,
            file = %log_file.display(),
            caller = options.caller,
            "ezlog logger ready"
        );

        Self {
            logger,
            options,
            created_at: Local::now(),
        }
    }

    /// Underlying engine handle, for anything this facade does not cover.
    pub fn writer(&self) -> &Logger {
        &self.logger
    }

    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    fn sub_logger(&self, prefix: Option<&Fields>) -> Logger {
        let mut sub = match prefix {
            Some(prefix) => self.logger.with_fields(prefix),
            None => self.logger.clone(),
        };
        if let Some(key) = self.options.prefix_timestamp() {
            sub = sub.with_field(key, &Utc::now().timestamp());
        }
        sub
    }

    /// Start an event at `level`, with `prefix` bound for this call only.
    #[track_caller]
    pub fn emit(&self, level: Level, prefix: Option<&Fields>) -> Event {
        self.sub_logger(prefix).event(level)
    }

    #[track_caller]
    pub fn trace(&self) -> Event {
        self.emit(Level::Trace, None)
    }

    #[track_caller]
    pub fn debug(&self) -> Event {
        self.emit(Level::Debug, None)
    }

    #[track_caller]
    pub fn info(&self) -> Event {
        self.emit(Level::Info, None)
    }

    #[track_caller]
    pub fn warn(&self) -> Event {
        self.emit(Level::Warn, None)
    }

    #[track_caller]
    pub fn error(&self) -> Event {
        self.emit(Level::Error, None)
    }

    /// The process exits with status 1 once the event is finished.
    #[track_caller]
    pub fn fatal(&self) -> Event {
        self.emit(Level::Fatal, None)
    }

    /// The current thread panics with the message once the event is finished.
    #[track_caller]
    pub fn panic(&self) -> Event {
        self.emit(Level::Panic, None)
    }

    #[track_caller]
    pub fn trace_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Trace, Some(prefix))
    }

    #[track_caller]
    pub fn debug_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Debug, Some(prefix))
    }

    #[track_caller]
    pub fn info_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Info, Some(prefix))
    }

    #[track_caller]
    pub fn warn_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Warn, Some(prefix))
    }

    #[track_caller]
    pub fn error_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Error, Some(prefix))
    }

    #[track_caller]
    pub fn fatal_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Fatal, Some(prefix))
    }

    #[track_caller]
    pub fn panic_with(&self, prefix: &Fields) -> Event {
        self.emit(Level::Panic, Some(prefix))
    }
}

fn apply_global_settings(options: &LogOptions) {
    let defaults = FieldNames::default();
    settings::set_global_level(options.level);
    settings::set_time_format(if options.unix_time {
        TimeFormat::Unix
    } else {
        TimeFormat::Rfc3339
    });
    settings::set_time_field_name(options.time_key().unwrap_or(&defaults.time));
    settings::set_message_field_name(options.msg_key().unwrap_or(&defaults.message));
    if options.caller {
        settings::set_caller_formatter(short_caller);
    }
}
