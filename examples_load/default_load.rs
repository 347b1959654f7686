use std::sync::Arc;
use std::time::Instant;

use ezlog::options::LogOptions;
use ezlog::sink::NoopSink;
use ezlog::Log;

fn main() {
    let log = Log::with_sink(LogOptions::default(), Arc::new(NoopSink));

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        log.info().uint("iteration", i).msg("default load test");
    }

    let elapsed = start.elapsed();
    println!("default config: wrote {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
