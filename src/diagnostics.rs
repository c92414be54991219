//! Per-run diagnostic log.
//!
//! Every warning or failure raised by a test body becomes a [`DiagnosticEntry`]. Messages are
//! formatted eagerly at the call site and owned by their entry; the engine drains the log before each
//! test and releases it at teardown, so each message is freed exactly once.

use std::fmt::{self, Write as _};

use tally_core::severity::Severity;
use tally_core::store::{GrowableStore, GrowthPolicy, StoreError};

/// Text rendered in place of a message whose formatting failed.
pub const UNFORMATTABLE_MESSAGE: &str = "<unformattable message>";

/// One captured warning or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    message: Option<String>,
    severity: Severity,
    line: u32,
}

impl DiagnosticEntry {
    /// Build an entry, formatting `message` immediately.
    ///
    /// If a `Display` impl inside `message` reports an error, the entry carries no message rather than
    /// a partially written one.
    pub fn new(severity: Severity, line: u32, message: impl fmt::Display) -> Self {
        Self {
            message: format_eagerly(message),
            severity,
            line,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Render as `<file>:<line> (<test-name>) [<SEVERITY>] <message>`.
    pub fn render(&self, file: &str, test_name: &str) -> String {
        format!(
            "{}:{} ({}) [{}] {}",
            file,
            self.line,
            test_name,
            DiagnosticLog::type_to_string(self.severity),
            self.message().unwrap_or(UNFORMATTABLE_MESSAGE)
        )
    }
}

fn format_eagerly(message: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{message}").ok()?;
    Some(out)
}

/// Ordered diagnostics captured during the current test run.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: GrowableStore<DiagnosticEntry>,
    dropped: usize,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            entries: GrowableStore::with_policy(policy),
            dropped: 0,
        }
    }

    /// Format `message` and append it as a new entry.
    ///
    /// ## Errors
    /// Returns [`StoreError`] if the log could not grow. The entry is lost and counted in
    /// [`DiagnosticLog::dropped`].
    pub fn push(&mut self, severity: Severity, line: u32, message: impl fmt::Display) -> Result<(), StoreError> {
        self.push_entry(DiagnosticEntry::new(severity, line, message))
    }

    /// Append an already formatted entry.
    pub fn push_entry(&mut self, entry: DiagnosticEntry) -> Result<(), StoreError> {
        self.entries.append(entry).inspect_err(|_| self.dropped += 1)
    }

    /// Release every entry's message and empty the log, keeping its storage for the next run.
    ///
    /// Returns how many entries were released. Calling it on an empty log is a no-op.
    pub fn clear_owned(&mut self) -> usize {
        self.dropped = 0;
        self.entries.drain().count()
    }

    /// Release every entry, then free the backing storage.
    pub fn release(&mut self) {
        self.clear_owned();
        self.entries.release();
    }

    /// Display label for a severity.
    pub fn type_to_string(severity: Severity) -> &'static str {
        severity.as_str()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Entries lost to allocation failure since the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn get(&self, index: usize) -> Option<&DiagnosticEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticEntry> {
        self.entries.iter()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.iter().filter(|entry| entry.severity == severity).count()
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a DiagnosticEntry;
    type IntoIter = std::slice::Iter<'a, DiagnosticEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
