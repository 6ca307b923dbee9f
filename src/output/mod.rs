//! Output sinks for the result report
//!
//! Hammers and the coordinator hand finished lines to a [`ReportSink`].
//! The binary writes them to standard output; tests collect them in a
//! [`BufferSink`].

mod formatter;

pub use formatter::{format_hammer_average, format_run_digest, format_throw, format_total_average};

use crate::error::Result;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for report lines
///
/// Shared by every hammer, so each call must write a whole line atomically
/// with respect to other callers.
pub trait ReportSink: Send + Sync {
    /// Emit one line (without trailing newline)
    fn emit(&self, line: &str) -> Result<()>;
}

/// Writes report lines to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for StdoutSink {
    fn emit(&self, line: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", line)?;
        handle.flush()?;
        Ok(())
    }
}

/// Collects report lines in memory
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines that start with `prefix`
    pub fn lines_starting_with(&self, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

impl ReportSink for BufferSink {
    fn emit(&self, line: &str) -> Result<()> {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
        Ok(())
    }
}
