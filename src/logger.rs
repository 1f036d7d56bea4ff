//! Logging sink attached to each assembly operation.
//!
//! Operations do not log through a global keyed logger. Each one carries a
//! [`Logger`], which filters by verbosity, honours a silent flag, and hands
//! surviving messages to a [`LogSink`]. The default sink forwards to
//! `tracing`; [`MemorySink`] keeps messages in memory.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Destination for log messages that passed the [`Logger`] filter.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards messages to the `tracing` macros under the `bootpack` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "bootpack", "{message}"),
            Level::WARN => tracing::warn!(target: "bootpack", "{message}"),
            Level::INFO => tracing::info!(target: "bootpack", "{message}"),
            Level::DEBUG => tracing::debug!(target: "bootpack", "{message}"),
            Level::TRACE => tracing::trace!(target: "bootpack", "{message}"),
        }
    }
}

/// Records every message it receives.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

/// Verbosity filter plus silent flag in front of a [`LogSink`].
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    level: LevelFilter,
    silent: bool,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            level: LevelFilter::INFO,
            silent: false,
        }
    }

    /// Logger that forwards to `tracing` at `INFO`.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Suppress every message regardless of level.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn enabled(&self, level: Level) -> bool {
        !self.silent && level <= self.level
    }

    pub fn log(&self, level: Level, message: impl fmt::Display) {
        if self.enabled(level) {
            self.sink.log(level, &message.to_string());
        }
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::DEBUG, message);
    }

    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::TRACE, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("silent", &self.silent)
            .finish_non_exhaustive()
    }
}
