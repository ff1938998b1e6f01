//! Output sinks for play lines
//!
//! The play core only ever hands finished lines to an `OutputSink`; where
//! they end up (terminal, log file, test buffer) is the caller's choice.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Capability that accepts one line of output at a time
pub trait OutputSink: Send + Sync {
    /// Emit a single line (without trailing newline)
    fn print(&self, line: &str);
}

impl<F> OutputSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn print(&self, line: &str) {
        self(line)
    }
}

/// Writes each line to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn print(&self, line: &str) {
        println!("{}", line);
    }
}

/// Emits each line as a tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn print(&self, line: &str) {
        info!(target: "pingpong::output", "{}", line);
    }
}

/// Collects lines in memory
///
/// Clones share the same buffer, so a caller can keep one clone and pass
/// another to the play.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        debug!("MemorySink::new: called");
        Self::default()
    }

    /// Snapshot of every line printed so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for MemorySink {
    fn print(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Sink selection for the `pp` binary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    #[default]
    Console,
    Log,
}

impl SinkKind {
    /// Build the sink this kind names
    pub fn build(&self) -> Arc<dyn OutputSink> {
        debug!(kind = %self, "SinkKind::build: called");
        match self {
            SinkKind::Console => Arc::new(ConsoleSink),
            SinkKind::Log => Arc::new(TracingSink),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Console => f.write_str("console"),
            SinkKind::Log => f.write_str("log"),
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(Self::Console),
            "log" | "tracing" => Ok(Self::Log),
            _ => Err(format!("Unknown sink: {}. Use: console or log", s)),
        }
    }
}
