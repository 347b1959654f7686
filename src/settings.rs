//! Process-wide engine settings.
//!
//! The level threshold, field names, time format and caller formatter are
//! shared by every [`crate::Logger`] in the process. [`crate::Log::new`]
//! writes them on construction, so when several facades are built the last
//! one wins, including for records emitted through the earlier ones.

use crate::caller::{full_caller, CallerFormatter};
use crate::level::Level;
use crate::record::{FieldNames, TimeFormat};
use parking_lot::RwLock;
use std::sync::LazyLock;

/// Snapshot of the process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub level: Level,
    pub names: FieldNames,
    pub time_format: TimeFormat,
    pub caller_formatter: CallerFormatter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Info,
            names: FieldNames::default(),
            time_format: TimeFormat::default(),
            caller_formatter: full_caller,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn current() -> Settings {
    SETTINGS.read().clone()
}

pub fn global_level() -> Level {
    SETTINGS.read().level
}

/// Records below `level` are discarded by every logger in the process.
pub fn set_global_level(level: Level) {
    SETTINGS.write().level = level;
}

pub fn set_time_field_name(name: impl Into<String>) {
    SETTINGS.write().names.time = name.into();
}

pub fn set_message_field_name(name: impl Into<String>) {
    SETTINGS.write().names.message = name.into();
}

pub fn set_time_format(format: TimeFormat) {
    SETTINGS.write().time_format = format;
}

pub fn set_caller_formatter(formatter: CallerFormatter) {
    SETTINGS.write().caller_formatter = formatter;
}

#[cfg(test)]
static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Serialize tests touching the process-wide settings and start each one
/// from the defaults.
#[cfg(test)]
pub(crate) fn lock_for_test() -> parking_lot::MutexGuard<'static, ()> {
    let guard = TEST_LOCK.lock();
    *SETTINGS.write() = Settings::default();
    guard
}
