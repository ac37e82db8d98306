//! Resolution event log.
//!
//! The resolver reports what it did through an [`EventSink`]. Sinks are
//! fire-and-forget: a sink that cannot write must swallow the failure.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::runtime::{Handle, RuntimeFlavor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Info => "INFO",
            EventLevel::Warn => "WARN",
            EventLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEvent {
    pub level: EventLevel,
    pub component: &'static str,
    pub message: String,
}

impl ResolutionEvent {
    pub fn info(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Info,
            component,
            message: message.into(),
        }
    }

    pub fn warn(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Warn,
            component,
            message: message.into(),
        }
    }

    pub fn error(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Error,
            component,
            message: message.into(),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: ResolutionEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: ResolutionEvent) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: ResolutionEvent) {
        match event.level {
            EventLevel::Info => tracing::info!(component = event.component, "{}", event.message),
            EventLevel::Warn => tracing::warn!(component = event.component, "{}", event.message),
            EventLevel::Error => tracing::error!(component = event.component, "{}", event.message),
        }
    }
}

/// Append-only text log, one line per event:
/// `[<rfc3339>] [<LEVEL>] [<component>] <message>`
///
/// Clones share one write lock, so concurrent resolutions never split or
/// merge lines.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one complete line, newline included, in a single call
    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Returns the whole log, or only its last `max_lines` lines
    pub fn read_recent(&self, max_lines: Option<usize>) -> std::io::Result<String> {
        let contents = fs::read_to_string(&self.path)?;
        let Some(max) = max_lines else {
            return Ok(contents);
        };
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(max);
        Ok(lines[start..].join("\n"))
    }
}

/// Log text for display, with a placeholder when there is nothing to show
pub fn log_text(log: Option<&FileEventLog>, max_lines: Option<usize>) -> String {
    let Some(log) = log else {
        return "No event log configured (set WEATHER_LOG_FILE)".to_string();
    };
    match log.read_recent(max_lines) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => "No events logged yet".to_string(),
        Err(e) => {
            tracing::debug!("Cannot read event log {}: {}", log.path().display(), e);
            "No events logged yet".to_string()
        }
    }
}

impl EventSink for FileEventLog {
    fn record(&self, event: ResolutionEvent) {
        let line = format!(
            "[{}] [{}] [{}] {}\n",
            Utc::now().to_rfc3339(),
            event.level,
            event.component,
            event.message.replace(['\r', '\n'], " ")
        );

        // Blocking file I/O: hand the worker thread back to the runtime
        // while writing, when the runtime allows it.
        let written = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.append(&line))
            }
            _ => self.append(&line),
        };
        if let Err(e) = written {
            tracing::warn!("Failed to write event log {}: {}", self.path.display(), e);
        }
    }
}

/// Sends every event to each inner sink
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn record(&self, event: ResolutionEvent) {
        for sink in &self.sinks {
            sink.record(event.clone());
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn file_log_appends_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("logs").join("weather.log"));

        log.record(ResolutionEvent::info("resolver", "geocoded Berlin"));
        log.record(ResolutionEvent::error("upstream", "timeout"));

        let contents = log.read_recent(None).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO] [resolver] geocoded Berlin"));
        assert!(lines[1].contains("[ERROR] [upstream] timeout"));
    }

    fn assert_well_formed(contents: &str, expected: usize) {
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), expected);
        for line in lines {
            assert!(line.starts_with('['), "malformed line {line:?}");
            assert!(line.contains("] [INFO] [resolver] writer "), "malformed line {line:?}");
            assert_eq!(line.matches("[INFO]").count(), 1, "merged line {line:?}");
        }
    }

    #[test]
    fn concurrent_writers_keep_one_event_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("weather.log"));

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let log = log.clone();
                scope.spawn(move || {
                    for i in 0..500 {
                        log.record(ResolutionEvent::info("resolver", format!("writer {writer} event {i}")));
                    }
                });
            }
        });

        assert_well_formed(&log.read_recent(None).unwrap(), 8 * 500);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tasks_keep_one_event_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("weather.log"));

        let tasks: Vec<_> = (0..8)
            .map(|writer| {
                let log = log.clone();
                tokio::spawn(async move {
                    for i in 0..100 {
                        log.record(ResolutionEvent::info("resolver", format!("writer {writer} event {i}")));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_well_formed(&log.read_recent(None).unwrap(), 8 * 100);
    }

    #[test]
    fn embedded_newlines_stay_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("weather.log"));

        log.record(ResolutionEvent::warn("resolver", "Rejected city\nfake [INFO] line"));

        let contents = log.read_recent(None).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("Rejected city fake"));
    }

    #[test]
    fn read_recent_returns_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("weather.log"));
        for i in 0..5 {
            log.record(ResolutionEvent::info("test", format!("event {i}")));
        }

        let tail = log.read_recent(Some(2)).unwrap();
        assert_eq!(tail.lines().count(), 2);
        assert!(tail.ends_with("event 4"));
    }

    #[test]
    fn unwritable_log_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        let log = FileEventLog::new(dir.path());
        log.record(ResolutionEvent::warn("test", "dropped"));
        assert!(log.read_recent(None).is_err());
    }

    #[test]
    fn log_text_placeholders() {
        assert!(log_text(None, None).contains("No event log configured"));

        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("missing.log"));
        assert_eq!(log_text(Some(&log), Some(10)), "No events logged yet");

        log.record(ResolutionEvent::info("test", "first"));
        assert!(log_text(Some(&log), Some(10)).contains("first"));
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = Arc::new(RecordingSink::default());
        let b = Arc::new(RecordingSink::default());
        let sinks: Vec<Arc<dyn EventSink>> = vec![
            a.clone() as Arc<dyn EventSink>,
            b.clone() as Arc<dyn EventSink>,
            Arc::new(NullSink),
        ];
        let fanout = FanoutSink::new(sinks);

        fanout.record(ResolutionEvent::info("test", "hello"));

        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events()[0].message, "hello");
    }
}
