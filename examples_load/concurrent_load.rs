use std::time::Instant;

use ezlog::options::{with_output_file_path, with_output_file_rotate, with_prefix_timestamp};
use ezlog::{fields, Log};

fn main() -> Result<(), ezlog::LogError> {
    let log = Log::new([
        with_output_file_path("./logs", "concurrent_load"),
        with_output_file_rotate(5, 1, 3, true),
        with_prefix_timestamp("ts"),
    ])?;

    let threads: u64 = 8;
    let per_thread: u64 = 25_000;
    let start = Instant::now();

    std::thread::scope(|scope| {
        for worker in 0..threads {
            let log = &log;
            scope.spawn(move || {
                let prefix = fields! { "worker" => worker };
                for i in 0..per_thread {
                    log.info_with(&prefix).uint("iteration", i).msg("concurrent load test");
                }
            });
        }
    });

    let n = threads * per_thread;
    let elapsed = start.elapsed();
    println!("{} threads: wrote {} events to {} in {:?} (~{:.0} ev/s)",
        threads,
        n,
        log.options().log_file().display(),
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
