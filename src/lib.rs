pub mod caller;
pub mod engine;
pub mod error;
pub mod level;
pub mod logger;
pub mod options;
pub mod record;
pub mod settings;
pub mod sink;

#[cfg(feature = "tracing-bridge")]
pub mod init;
#[cfg(feature = "tracing-bridge")]
pub mod layer;

pub use engine::{Event, Logger};
pub use error::LogError;
pub use level::Level;
pub use logger::Log;
pub use options::{LogOption, LogOptions};
pub use record::Fields;

/// Build a [`Fields`] map from `key => value` pairs. Values can be of any
/// type implementing `serde::Serialize`.
///
/// ```
/// let prefix = ezlog::fields! { "service" => "api", "shard" => 3 };
/// assert_eq!(prefix["shard"], 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::record::to_value(&$value));
        )+
        fields
    }};
}
