use std::io;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    PoisonError, RwLock,
};

use crate::Severity;

/// Output destination for formatted log lines.
///
/// The logger hands over one formatted line at a time. Where the line ends up
/// (console, file, remote collector) is entirely up to the sink; write
/// failures are swallowed by the logger and never reach the caller.
pub trait LogSink: Send + Sync {
    /// Write a single formatted line to the underlying destination.
    fn write(&self, line: &str) -> io::Result<()>;
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write(&self, line: &str) -> io::Result<()> {
        self(line);
        Ok(())
    }
}

/// Default sink that prints each line to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, line: &str) -> io::Result<()> {
        use io::Write;

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle, "{}", line)
    }
}

/// A logger that drops records below a configurable severity threshold and
/// forwards the rest to a [`LogSink`].
///
/// The threshold defaults to [`Severity::Info`]. It can be replaced at any
/// time from any thread, and the new value applies to all subsequent
/// [`log`](LevelFilteredLogger::log) calls. Hosts typically configure the
/// threshold once at startup via [`LoggerConfig`](crate::LoggerConfig) and
/// share the logger behind an `Arc`.
///
/// # Examples
/// ```
/// use relay_core::{LevelFilteredLogger, Severity};
///
/// let logger = LevelFilteredLogger::new(|line: &str| eprintln!("{}", line));
/// logger.set_min_severity(Severity::Warning);
/// logger.info("not forwarded");
/// logger.error("forwarded as \"[ERROR] forwarded\"");
/// ```
pub struct LevelFilteredLogger {
    min_severity: RwLock<Severity>,
    sink: Box<dyn LogSink>,
    dropped_writes: AtomicU64,
}

impl LevelFilteredLogger {
    /// Create a logger forwarding to `sink` with the default `Info` threshold.
    pub fn new(sink: impl LogSink + 'static) -> Self {
        LevelFilteredLogger::from_parts(Severity::Info, Box::new(sink))
    }

    pub(crate) fn from_parts(min_severity: Severity, sink: Box<dyn LogSink>) -> Self {
        LevelFilteredLogger {
            min_severity: RwLock::new(min_severity),
            sink,
            dropped_writes: AtomicU64::new(0),
        }
    }

    /// Current severity threshold.
    pub fn min_severity(&self) -> Severity {
        // Poisoning is only possible if a thread panicked while holding the
        // lock, and the accessors cannot panic mid-update. Recover instead of
        // propagating: logging must never take the host down.
        *self
            .min_severity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the severity threshold.
    ///
    /// Takes effect for all subsequent [`log`](LevelFilteredLogger::log)
    /// calls on any thread. Safe to call concurrently with `log`.
    pub fn set_min_severity(&self, level: Severity) {
        *self
            .min_severity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Number of records that passed the filter but failed to reach the sink.
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes.load(Ordering::Relaxed)
    }

    /// Log `message` at `level`.
    ///
    /// Records below the current threshold are dropped before any formatting
    /// work happens. Everything else is forwarded to the sink exactly once,
    /// formatted as `[LEVEL] message`. Sink failures are swallowed and
    /// counted; this call never fails and never panics.
    pub fn log(&self, level: Severity, message: &str) {
        if level < self.min_severity() {
            return;
        }

        let line = format!("[{}] {}", level, message);
        if self.sink.write(&line).is_err() {
            self.dropped_writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Log `message` at `Error` severity.
    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    /// Log `message` at `Warning` severity.
    pub fn warn(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    /// Log `message` at `Info` severity.
    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    /// Log `message` at `Debug` severity.
    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    /// Log at `Debug` severity, rendering the message only when `Debug`
    /// passes the current threshold.
    ///
    /// Use this when building the message is expensive, so suppressed records
    /// pay nothing.
    pub fn debug_with(&self, message: impl FnOnce() -> String) {
        if Severity::Debug < self.min_severity() {
            return;
        }
        self.log(Severity::Debug, &message());
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::{LevelFilteredLogger, LogSink};
    use crate::Severity;

    fn recording_logger() -> (LevelFilteredLogger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let logger = LevelFilteredLogger::new(move |line: &str| {
            sink_lines.lock().unwrap().push(line.to_owned());
        });
        (logger, lines)
    }

    struct FailingSink;

    impl LogSink for FailingSink {
        fn write(&self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is gone"))
        }
    }

    #[test]
    fn default_threshold_is_info() {
        let (logger, lines) = recording_logger();

        logger.debug("hidden");
        logger.info("shown");

        assert_eq!(*lines.lock().unwrap(), vec!["[INFO] shown"]);
    }

    #[test]
    fn drops_records_below_threshold() {
        let (logger, lines) = recording_logger();
        logger.set_min_severity(Severity::Warning);

        logger.log(Severity::Info, "hello");
        assert!(lines.lock().unwrap().is_empty());

        logger.log(Severity::Error, "boom");
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("boom"));
    }

    #[test]
    fn forwards_threshold_level_and_above() {
        let (logger, lines) = recording_logger();
        logger.set_min_severity(Severity::Warning);

        logger.warn("at threshold");
        logger.error("above threshold");

        assert_eq!(
            *lines.lock().unwrap(),
            vec!["[WARNING] at threshold", "[ERROR] above threshold"]
        );
    }

    #[test]
    fn formats_lines_with_severity_label() {
        let (logger, lines) = recording_logger();

        logger.error("boom");

        assert_eq!(*lines.lock().unwrap(), vec!["[ERROR] boom"]);
    }

    #[test]
    fn setting_the_same_threshold_twice_is_idempotent() {
        let (logger, lines) = recording_logger();

        logger.set_min_severity(Severity::Error);
        logger.set_min_severity(Severity::Error);

        assert_eq!(logger.min_severity(), Severity::Error);
        logger.warn("still hidden");
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn sink_failures_are_swallowed_and_counted() {
        let logger = LevelFilteredLogger::new(FailingSink);

        logger.error("lost");
        logger.error("also lost");

        assert_eq!(logger.dropped_writes(), 2);
    }

    #[test]
    fn suppressed_records_are_not_counted_as_dropped() {
        let logger = LevelFilteredLogger::new(FailingSink);

        logger.debug("filtered before the sink");

        assert_eq!(logger.dropped_writes(), 0);
    }

    #[test]
    fn debug_with_skips_rendering_when_filtered() {
        let (logger, lines) = recording_logger();

        logger.debug_with(|| panic!("must not be rendered"));

        logger.set_min_severity(Severity::Debug);
        logger.debug_with(|| "rendered".to_owned());

        assert_eq!(*lines.lock().unwrap(), vec!["[DEBUG] rendered"]);
    }

    #[test]
    fn threshold_changes_are_visible_across_threads() {
        let (logger, lines) = recording_logger();
        let logger = Arc::new(logger);

        {
            let logger = Arc::clone(&logger);
            let _ = std::thread::spawn(move || {
                logger.set_min_severity(Severity::Error);
            })
            .join();
        }

        assert_eq!(logger.min_severity(), Severity::Error);
        logger.info("hidden after remote update");
        assert!(lines.lock().unwrap().is_empty());
    }
}
