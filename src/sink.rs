use crate::error::LogError;
use crate::options::LogOptions;
use logroller::{Compression, LogRoller, LogRollerBuilder, Rotation, RotationSize};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size the rolling writer uses when `max_size_mb` is zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Synchronous destination for encoded records.
///
/// Implementations must tolerate concurrent calls: every emission on every
/// thread ends in `write_line` on the same shared sink.
pub trait LogSink: Send + Sync {
    /// Write one newline-terminated record.
    ///
    /// **Returns**
    /// - `Ok(())` once the bytes were handed to the destination.
    /// - `Err(..)` on I/O failure. The engine reports it on stderr and drops
    ///   the record; there is no retry.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Flush buffered bytes. Default implementation is a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Rolling file sink writing to `{file_path}/{file_name}.log`.
///
/// Size-based rolling, count-based retention and gzip compression of rolled
/// files are delegated to `logroller`. Rolled files are never pruned by age. Writes are serialized by a mutex and
/// flushed line by line, so a record is on disk once `write_line` returns.
pub struct RollingFileSink {
    path: PathBuf,
    roller: Mutex<LogRoller>,
}

impl RollingFileSink {
    /// Create the output directory if needed and open the active file.
    ///
    /// **Errors**
    /// - [`LogError::CreateDir`] if the directory cannot be created.
    /// - [`LogError::OpenSink`] if the rolling writer cannot open the file.
    pub fn open(options: &LogOptions) -> Result<Self, LogError> {
        let dir = options.file_path.as_path();
        std::fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = options.log_file();
        let file_name = format!("{}.log", options.file_name);
        let rotation = &options.rotation;
        let max_size_mb = if rotation.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            rotation.max_size_mb
        };

        let mut builder = LogRollerBuilder::new(dir, Path::new(&file_name))
            .rotation(Rotation::SizeBased(RotationSize::MB(max_size_mb)));
        if rotation.max_backups > 0 {
            builder = builder.max_keep_files(rotation.max_backups);
        }
        if rotation.compress {
            builder = builder.compression(Compression::Gzip);
        }
        if rotation.max_age_days > 0 {
            tracing::warn!(
                max_age_days = rotation.max_age_days,
                file = %path.display(),
                "age-based retention is not supported, rolled files are pruned by count only"
            );
        }

        let roller = builder.build().map_err(|e| LogError::OpenSink {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path,
            roller: Mutex::new(roller),
        })
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for RollingFileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut roller = self.roller.lock();
        roller.write_all(line.as_bytes())?;
        roller.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.roller.lock().flush()
    }
}

impl std::fmt::Debug for RollingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingFileSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// A sink that keeps every line in memory.
///
/// Useful for asserting on emitted records in tests and for embedding the
/// logger where records are shipped elsewhere by the application.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, without their trailing newline.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Written lines parsed back into JSON values. Lines that are not valid
    /// JSON are skipped.
    pub fn records(&self) -> Vec<Value> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of the logger itself without any I/O.
#[derive(Clone, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{with_output_file_path, with_output_file_rotate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::Registry;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Write a little over `megabytes` MB in 1 KiB lines.
    fn fill(sink: &RollingFileSink, megabytes: usize) {
        let line = format!("{}\n", "x".repeat(1023));
        for _ in 0..(megabytes * 1024 + 64) {
            sink.write_line(&line).unwrap();
        }
    }

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn memory_sink_strips_newlines_and_parses_records() {
        let sink = MemorySink::new();
        sink.write_line("{\"level\":\"info\"}\n").unwrap();
        sink.write_line("not json\n").unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines()[0], "{\"level\":\"info\"}");
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "info");
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn rolling_sink_creates_directory_and_appends_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        let options = LogOptions::from_options([
            with_output_file_path(&dir, "app"),
            with_output_file_rotate(1, 0, 0, false),
        ]);

        let sink = RollingFileSink::open(&options).unwrap();
        assert_eq!(sink.path(), dir.join("app.log").as_path());
        sink.write_line("{\"n\":1}\n").unwrap();
        sink.write_line("{\"n\":2}\n").unwrap();

        let written: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("app.log"))
            .collect();
        assert_eq!(written.len(), 1);
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n");
    }

    #[test]
    fn rolled_files_are_compressed_and_capped_by_count() {
        let tmp = tempfile::tempdir().unwrap();
        let options = LogOptions::from_options([
            with_output_file_path(tmp.path(), "access"),
            with_output_file_rotate(1, 0, 1, true),
        ]);
        let sink = RollingFileSink::open(&options).unwrap();

        fill(&sink, 1);
        sink.write_line("{\"after\":\"roll\"}\n").unwrap();

        let expected = ["access.log", "access.log.1.gz"];
        let deadline = Instant::now() + Duration::from_secs(5);
        while file_names(tmp.path()) != expected && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(file_names(tmp.path()), expected);
    }

    #[test]
    fn zero_max_size_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let options = LogOptions::from_options([
            with_output_file_path(tmp.path(), "access"),
            with_output_file_rotate(0, 0, 0, false),
        ]);
        let sink = RollingFileSink::open(&options).unwrap();

        fill(&sink, 2);

        assert_eq!(file_names(tmp.path()), ["access.log"]);
        let size = std::fs::metadata(tmp.path().join("access.log")).unwrap().len();
        assert!(size > 2 * 1024 * 1024);
    }

    #[test]
    fn unenforced_max_age_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = Registry::default().with(WarnCounter(Arc::clone(&warnings)));

        tracing::subscriber::with_default(subscriber, || {
            let without_age = LogOptions::from_options([
                with_output_file_path(tmp.path(), "a"),
                with_output_file_rotate(1, 0, 1, false),
            ]);
            RollingFileSink::open(&without_age).unwrap();
            assert_eq!(warnings.load(Ordering::Relaxed), 0);

            let with_age = LogOptions::from_options([
                with_output_file_path(tmp.path(), "b"),
                with_output_file_rotate(1, 7, 1, false),
            ]);
            RollingFileSink::open(&with_age).unwrap();
        });

        assert_eq!(warnings.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn rolling_sink_reports_unusable_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let options = LogOptions::from_options([with_output_file_path(&blocker, "app")]);

        let err = RollingFileSink::open(&options).unwrap_err();
        assert!(matches!(err, LogError::CreateDir { ref path, .. } if path == &blocker));
    }
}
