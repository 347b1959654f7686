use std::path::PathBuf;

/// Error type returned by logger construction and configuration parsing.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open rolling log file {path}: {reason}")]
    OpenSink { path: PathBuf, reason: String },

    #[error("unknown log level: {0:?}")]
    InvalidLevel(String),

    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(String),
}
