//! Diagnostic severity vocabulary.

/// Label used for a raw severity value that does not name a [`Severity`].
pub const UNKNOWN_SEVERITY_LABEL: &str = "UNKNOWN SEVERITY";

/// How serious a captured diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Warning = 0,
    Error = 1,
    Critical = 2,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Warning, Severity::Error, Severity::Critical];

    /// Stable display label, as printed in `[...]` on each diagnostic line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    pub const fn from_raw(raw: u8) -> Option<Severity> {
        match raw {
            0 => Some(Severity::Warning),
            1 => Some(Severity::Error),
            2 => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for a raw severity discriminant, e.g. one read back from an FFI boundary.
///
/// ## Examples
/// ```rust
/// use tally_core::severity::severity_label;
///
/// assert_eq!(severity_label(1), "ERROR");
/// assert_eq!(severity_label(42), "UNKNOWN SEVERITY");
/// ```
pub const fn severity_label(raw: u8) -> &'static str {
    match Severity::from_raw(raw) {
        Some(severity) => severity.as_str(),
        None => UNKNOWN_SEVERITY_LABEL,
    }
}
