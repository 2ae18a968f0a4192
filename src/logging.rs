//! Injectable log sinks for ingestion events.
//!
//! Every component receives a [`Logger`] handle instead of writing to a process-wide logger.
//! The default deployment appends to a single file ([`FileLogSink`]) and mirrors each line
//! into `tracing` ([`TracingLogSink`]); tests capture lines with [`MemoryLogSink`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;

/// Shared logging handle passed to readers, the validator, writers and the pipeline.
pub type Logger = Arc<dyn LogSink>;

/// Log level of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for ingestion log events.
///
/// Implementors only provide [`LogSink::log`]; the level helpers forward to it.
pub trait LogSink: Send + Sync {
    /// Record one event.
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message)
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message)
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message)
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message)
    }
}

/// Format one log line as `<timestamp> - <LEVEL> - <message>`.
pub fn format_line(level: LogLevel, message: &str) -> String {
    format!(
        "{} - {} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    min_level: LogLevel,
    lock: Mutex<()>,
}

impl FileLogSink {
    /// Create a file sink that appends every event (DEBUG and above) to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are reported to `tracing`
    /// and otherwise ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_min_level(path, LogLevel::Debug)
    }

    /// Create a file sink that drops events below `min_level`.
    pub fn with_min_level(path: impl AsRef<Path>, min_level: LogLevel) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            min_level,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{line}"));
        if let Err(e) = res {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot append to log file");
        }
    }
}

impl LogSink for FileLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        if level >= self.min_level {
            self.append_line(&format_line(level, message));
        }
    }
}

/// Forwards events to the `tracing` macros at the matching level.
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// A sink that fans out events to a list of sinks.
#[derive(Default)]
pub struct CompositeLogSink {
    sinks: Vec<Logger>,
}

impl CompositeLogSink {
    /// Create a composite sink from a list of sinks.
    pub fn new(sinks: Vec<Logger>) -> Self {
        Self { sinks }
    }
}

impl fmt::Debug for CompositeLogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeLogSink")
            .field("sinks_len", &self.sinks.len())
            .finish()
    }
}

impl LogSink for CompositeLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        for s in &self.sinks {
            s.log(level, message);
        }
    }
}

/// Keeps events in memory; used to assert on log output in tests.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut r) = self.records.lock() {
            r.push((level, message.to_string()));
        }
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// The deployment logger: append to `log_file` and mirror into `tracing`.
pub fn file_logger(log_file: impl AsRef<Path>, min_level: LogLevel) -> Logger {
    Arc::new(CompositeLogSink::new(vec![
        Arc::new(FileLogSink::with_min_level(log_file, min_level)),
        Arc::new(TracingLogSink),
    ]))
}

/// Install the `tracing` subscriber used by the binary (`RUST_LOG` overrides the default).
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_appends_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileLogSink::new(&path);
        sink.info("first");
        sink.error("second");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - first"));
        assert!(lines[1].ends_with(" - ERROR - second"));
    }

    #[test]
    fn file_sink_respects_min_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileLogSink::with_min_level(&path, LogLevel::Info);
        sink.debug("hidden");
        sink.warning("shown");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("hidden"));
        assert!(text.contains(" - WARNING - shown"));
    }

    #[test]
    fn composite_fans_out() {
        let a = Arc::new(MemoryLogSink::new());
        let b = Arc::new(MemoryLogSink::new());
        let sink = CompositeLogSink::new(vec![a.clone(), b.clone()]);
        sink.warning("w");
        assert_eq!(a.records(), vec![(LogLevel::Warning, "w".to_string())]);
        assert_eq!(b.records(), a.records());
    }

    #[test]
    fn line_format_has_timestamp_prefix() {
        let line = format_line(LogLevel::Debug, "msg");
        // YYYY-MM-DD HH:MM:SS,mmm
        let (ts, rest) = line.split_at(23);
        assert_eq!(ts.len(), 23);
        assert_eq!(&ts[19..20], ",");
        assert_eq!(rest, " - DEBUG - msg");
    }
}
