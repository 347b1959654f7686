use crate::level::Level;
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use serde_json::Value;

/// Insertion-ordered set of record fields. Inserting an existing key
/// replaces its value in place.
pub type Fields = serde_json::Map<String, Value>;

/// How the record time is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// RFC 3339 in local time, second precision.
    #[default]
    Rfc3339,
    /// Integer seconds since the Unix epoch.
    Unix,
}

/// Names of the fields the engine writes on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub level: String,
    pub time: String,
    pub message: String,
    pub caller: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            level: "level".to_string(),
            time: "time".to_string(),
            message: "message".to_string(),
            caller: "caller".to_string(),
        }
    }
}

/// One finalized structured record, ready to be encoded for a sink.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    /// Bound context fields followed by the event's own fields.
    pub fields: Fields,
    pub caller: Option<String>,
    pub message: Option<String>,
}

impl LogRecord {
    /// Encode as one JSON object.
    ///
    /// Field order is level, fields, time, caller, message. The engine's own
    /// fields take precedence over a bound or event field of the same name;
    /// a field named like the level field is dropped.
    pub fn to_json(&self, names: &FieldNames, time_format: TimeFormat) -> Value {
        let mut object = Fields::with_capacity(self.fields.len() + 4);
        object.insert(names.level.clone(), Value::from(self.level.as_str()));
        for (key, value) in &self.fields {
            if *key != names.level {
                object.insert(key.clone(), value.clone());
            }
        }
        let time = match time_format {
            TimeFormat::Rfc3339 => {
                Value::from(self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false))
            }
            TimeFormat::Unix => Value::from(self.timestamp.timestamp()),
        };
        object.insert(names.time.clone(), time);
        if let Some(caller) = &self.caller {
            object.insert(names.caller.clone(), Value::from(caller.as_str()));
        }
        if let Some(message) = &self.message {
            object.insert(names.message.clone(), Value::from(message.as_str()));
        }
        Value::Object(object)
    }

    /// Encode as a single newline-terminated JSON line.
    pub fn to_line(&self, names: &FieldNames, time_format: TimeFormat) -> String {
        let mut line = self.to_json(names, time_format).to_string();
        line.push('\n');
        line
    }
}

/// Convert any serializable value into a field value.
///
/// Values serde cannot represent as JSON (maps with non-string keys, for
/// instance) are stored as their error text so the record is never lost.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| Value::String(format!("!ERROR: {e}")))
}
