use crate::level::Level;
use crate::record::Fields;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rotation limits handed to the rolling file writer.
///
/// **Fields**
/// - `max_size_mb`: size in megabytes at which the active file is rolled.
///   `0` falls back to the writer default of 100 MB.
/// - `max_age_days`: retention age of rolled files in days. Recorded but not
///   enforced: the rolling writer prunes by count only, and opening a
///   [`crate::sink::RollingFileSink`] with a non-zero value logs a warning.
/// - `max_backups`: number of rolled files kept, `0` keeps all.
/// - `compress`: gzip rolled files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationOptions {
    pub max_size_mb: u64,
    pub max_age_days: u64,
    pub max_backups: u64,
    pub compress: bool,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 10,
            max_age_days: 1,
            max_backups: 1,
            compress: true,
        }
    }
}

/// Fully resolved configuration of a [`crate::Log`].
///
/// Built by applying [`LogOption`]s in order over [`LogOptions::default`].
/// It can also be deserialized from an application config file; every field
/// is optional there and falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub file_path: PathBuf,
    pub file_name: String,
    pub rotation: RotationOptions,
    pub level: Level,
    /// Write the record time as Unix seconds instead of RFC 3339.
    pub unix_time: bool,
    /// Attach a `dir/file:line` caller field to every record.
    pub caller: bool,
    pub custom_time_key: Option<String>,
    pub custom_msg_key: Option<String>,
    /// Fields bound to every record for the lifetime of the logger.
    pub global_prefix: Fields,
    /// When set, every emission stamps the current Unix time under this key.
    pub prefix_timestamp_key: Option<String>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("./logs/"),
            file_name: "access".to_string(),
            rotation: RotationOptions::default(),
            level: Level::Info,
            unix_time: false,
            caller: false,
            custom_time_key: None,
            custom_msg_key: None,
            global_prefix: Fields::new(),
            prefix_timestamp_key: None,
        }
    }
}

impl LogOptions {
    /// Apply `options` in order over the defaults. Later options targeting
    /// the same field win.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LogOption>,
    {
        let mut resolved = Self::default();
        for option in options {
            option.apply(&mut resolved);
        }
        resolved
    }

    /// Path of the active log file, `{file_path}/{file_name}.log`.
    pub fn log_file(&self) -> PathBuf {
        self.file_path.join(format!("{}.log", self.file_name))
    }

    pub(crate) fn time_key(&self) -> Option<&str> {
        non_empty(self.custom_time_key.as_deref())
    }

    pub(crate) fn msg_key(&self) -> Option<&str> {
        non_empty(self.custom_msg_key.as_deref())
    }

    pub(crate) fn prefix_timestamp(&self) -> Option<&str> {
        self.prefix_timestamp_key.as_deref()
    }
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.is_empty())
}

/// One configuration intent, applied to a [`LogOptions`] during
/// construction of a [`crate::Log`].
///
/// Values are usually obtained from the `with_*` functions of this module.
#[derive(Clone, Debug, PartialEq)]
pub enum LogOption {
    OutputFilePath { path: PathBuf, file_name: String },
    OutputFileRotate(RotationOptions),
    UnixTimestamp,
    Level(Level),
    GlobalPrefix(Fields),
    PrefixTimestamp(String),
    Caller,
    CustomTimeKey(String),
    CustomMsgKey(String),
}

impl LogOption {
    /// Mutate only the fields this option targets.
    pub fn apply(self, options: &mut LogOptions) {
        match self {
            LogOption::OutputFilePath { path, file_name } => {
                options.file_path = path;
                options.file_name = file_name;
            }
            LogOption::OutputFileRotate(rotation) => options.rotation = rotation,
            LogOption::UnixTimestamp => options.unix_time = true,
            LogOption::Level(level) => options.level = level,
            LogOption::GlobalPrefix(prefix) => options.global_prefix = prefix,
            LogOption::PrefixTimestamp(key) => options.prefix_timestamp_key = Some(key),
            LogOption::Caller => options.caller = true,
            LogOption::CustomTimeKey(key) => options.custom_time_key = Some(key),
            LogOption::CustomMsgKey(key) => options.custom_msg_key = Some(key),
        }
    }
}

/// Write to `{path}/{file_name}.log`. The directory is created on
/// construction if it does not exist.
pub fn with_output_file_path(path: impl AsRef<Path>, file_name: impl Into<String>) -> LogOption {
    LogOption::OutputFilePath {
        path: path.as_ref().to_path_buf(),
        file_name: file_name.into(),
    }
}

/// Set all rotation limits at once.
pub fn with_output_file_rotate(
    max_size_mb: u64,
    max_age_days: u64,
    max_backups: u64,
    compress: bool,
) -> LogOption {
    LogOption::OutputFileRotate(RotationOptions {
        max_size_mb,
        max_age_days,
        max_backups,
        compress,
    })
}

pub fn with_log_unix_timestamp() -> LogOption {
    LogOption::UnixTimestamp
}

pub fn with_level(level: Level) -> LogOption {
    LogOption::Level(level)
}

pub fn with_level_trace() -> LogOption {
    with_level(Level::Trace)
}

pub fn with_level_debug() -> LogOption {
    with_level(Level::Debug)
}

pub fn with_level_info() -> LogOption {
    with_level(Level::Info)
}

pub fn with_level_warn() -> LogOption {
    with_level(Level::Warn)
}

pub fn with_level_error() -> LogOption {
    with_level(Level::Error)
}

pub fn with_level_fatal() -> LogOption {
    with_level(Level::Fatal)
}

pub fn with_level_panic() -> LogOption {
    with_level(Level::Panic)
}

/// Bind `prefix` to every record. Replaces any previously set global prefix.
pub fn with_global_prefix(prefix: Fields) -> LogOption {
    LogOption::GlobalPrefix(prefix)
}

/// Stamp the Unix time of each emission under `key`. An empty key still
/// enables stamping, under the field name `""`.
pub fn with_prefix_timestamp(key: impl Into<String>) -> LogOption {
    LogOption::PrefixTimestamp(key.into())
}

pub fn with_caller() -> LogOption {
    LogOption::Caller
}

/// Rename the record time field (default `time`).
pub fn with_custom_time_key(key: impl Into<String>) -> LogOption {
    LogOption::CustomTimeKey(key.into())
}

/// Rename the record message field (default `message`).
pub fn with_custom_msg_key(key: impl Into<String>) -> LogOption {
    LogOption::CustomMsgKey(key.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[test]
    fn no_options_yield_defaults() {
        let options = LogOptions::from_options(Vec::new());
        assert_eq!(options.file_path, PathBuf::from("./logs/"));
        assert_eq!(options.file_name, "access");
        assert_eq!(options.rotation.max_size_mb, 10);
        assert_eq!(options.rotation.max_age_days, 1);
        assert_eq!(options.rotation.max_backups, 1);
        assert!(options.rotation.compress);
        assert_eq!(options.level, Level::Info);
        assert!(!options.unix_time);
        assert!(!options.caller);
        assert!(options.custom_time_key.is_none());
        assert!(options.custom_msg_key.is_none());
        assert!(options.global_prefix.is_empty());
        assert!(options.prefix_timestamp_key.is_none());
    }

    #[test]
    fn last_option_for_a_field_wins() {
        let options = LogOptions::from_options([with_level_warn(), with_level_error()]);
        assert_eq!(options.level, Level::Error);

        let options = LogOptions::from_options([
            with_custom_msg_key("msg"),
            with_custom_msg_key("text"),
        ]);
        assert_eq!(options.custom_msg_key.as_deref(), Some("text"));
    }

    #[test]
    fn disjoint_options_commute() {
        let forward = vec![
            with_output_file_path("/var/log/app", "api"),
            with_output_file_rotate(50, 7, 3, false),
            with_log_unix_timestamp(),
            with_level_debug(),
            with_caller(),
            with_prefix_timestamp("ts2"),
            with_custom_time_key("t"),
            with_custom_msg_key("m"),
            with_global_prefix(fields! { "service" => "x" }),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(4);

        let expected = LogOptions::from_options(forward);
        assert_eq!(LogOptions::from_options(backward), expected);
        assert_eq!(LogOptions::from_options(rotated), expected);
    }

    #[test]
    fn global_prefix_replaces_instead_of_merging() {
        let options = LogOptions::from_options([
            with_global_prefix(fields! { "service" => "x", "region" => "eu" }),
            with_global_prefix(fields! { "node" => 3 }),
        ]);
        assert_eq!(options.global_prefix, fields! { "node" => 3 });
    }

    #[test]
    fn rotation_is_set_as_one_group() {
        let options = LogOptions::from_options([with_output_file_rotate(0, 0, 0, false)]);
        assert_eq!(
            options.rotation,
            RotationOptions {
                max_size_mb: 0,
                max_age_days: 0,
                max_backups: 0,
                compress: false,
            }
        );
    }

    #[test]
    fn log_file_joins_path_and_name() {
        let options = LogOptions::from_options([with_output_file_path("/tmp/x", "svc")]);
        assert_eq!(options.log_file(), PathBuf::from("/tmp/x/svc.log"));
        assert_eq!(
            LogOptions::default().log_file(),
            PathBuf::from("./logs/access.log")
        );
    }

    #[test]
    fn empty_field_names_are_treated_as_unset() {
        let options = LogOptions::from_options([
            with_custom_time_key(""),
            with_custom_msg_key(""),
        ]);
        assert_eq!(options.time_key(), None);
        assert_eq!(options.msg_key(), None);
    }

    #[test]
    fn empty_prefix_timestamp_key_still_enables_stamping() {
        let options = LogOptions::from_options([with_prefix_timestamp("")]);
        assert_eq!(options.prefix_timestamp(), Some(""));
        assert_eq!(LogOptions::default().prefix_timestamp(), None);
    }

    #[test]
    fn deserializes_partial_config() {
        let options: LogOptions = serde_json::from_str(
            r#"{"file_name":"api","level":"warn","rotation":{"max_backups":5}}"#,
        )
        .unwrap();
        assert_eq!(options.file_name, "api");
        assert_eq!(options.level, Level::Warn);
        assert_eq!(options.rotation.max_backups, 5);
        assert_eq!(options.rotation.max_size_mb, 10);
        assert_eq!(options.file_path, PathBuf::from("./logs/"));
    }
}
