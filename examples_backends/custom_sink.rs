use std::io;
use std::sync::Arc;

use ezlog::options::{with_global_prefix, with_level_trace, LogOptions};
use ezlog::sink::LogSink;
use ezlog::{fields, Log};

/// Example of plugging a completely custom destination in by implementing
/// the `LogSink` trait directly. Here every record is printed to stdout.
struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        print!("[stdout-sink] {line}");
        Ok(())
    }
}

fn main() {
    let options = LogOptions::from_options([
        with_level_trace(),
        with_global_prefix(fields! { "app" => "custom-sink" }),
    ]);
    let log = Log::with_sink(options, Arc::new(StdoutSink));

    log.trace().msg("custom sink example started");
    log.error_with(&fields! { "db" => "my-custom-db" }).msg("simulated error");
}
