//! Shared log-stream types.
//!
//! Every operation in the crate reports back through [`RunListener`]
//! callbacks so a rendering surface (page, terminal, test harness) can paint
//! the log panel and per-step status without subscribing to an event bus.

use crate::domain::run::StepState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Severity tag attached to every log entry.
///
/// These are the four tags the launcher surface renders, not the tracing
/// levels; `Success` exists because "it worked" lines are styled differently
/// from plain information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Plain progress information.
    Info,
    /// Something finished well.
    Success,
    /// Something is off but the operation carries on.
    Warning,
    /// The operation aborted.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        write!(f, "{}", tag)
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info | LogLevel::Success => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// One line in the launcher's log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was produced.
    pub timestamp: DateTime<Utc>,
    /// Severity tag.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
}

impl LogEntry {
    /// Entry stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Receives log entries and step state changes.
///
/// Implementations must tolerate being called from a spawned run task;
/// callbacks are synchronous and should return quickly.
pub trait RunListener: Send + Sync {
    /// Called for every log line the launcher or a run produces.
    fn on_log(&self, entry: &LogEntry);

    /// Called when a step changes state during a run. Default: ignore.
    fn on_step_state(&self, index: usize, state: StepState) {
        let _ = (index, state);
    }
}

/// Build an entry, mirror it to `tracing`, hand it to the listener.
pub(crate) fn emit_log(listener: &dyn RunListener, level: LogLevel, message: impl Into<String>) {
    let entry = LogEntry::new(level, message);
    match tracing::Level::from(entry.level) {
        tracing::Level::ERROR => tracing::error!("{}", entry.message),
        tracing::Level::WARN => tracing::warn!("{}", entry.message),
        _ => tracing::info!("{}", entry.message),
    }
    listener.on_log(&entry);
}

/// A [`RunListener`] that retains everything it hears.
///
/// Used by tests to assert on the log stream and by surfaces that render
/// the backlog after the fact.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Mutex<Vec<LogEntry>>,
    transitions: Mutex<Vec<(usize, StepState)>>,
}

impl LogBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry heard so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    /// Every `(step index, state)` transition heard so far, oldest first.
    pub fn transitions(&self) -> Vec<(usize, StepState)> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many entries carry the given level.
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }
}

impl RunListener for LogBuffer {
    fn on_log(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
    }

    fn on_step_state(&self, index: usize, state: StepState) {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((index, state));
    }
}
