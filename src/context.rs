//! Active-run context.
//!
//! The engine owns one [`RunContext`]: the result state and diagnostic log of the test currently
//! executing. While a test body runs, the context is parked in a thread-local slot so assertion
//! call-sites can reach it without a handle; once the body returns (or unwinds) it is moved back.
//!
//! Only one run may be active per thread. Assertions raised while no test is running are ignored
//! and logged.

use std::cell::RefCell;
use std::fmt;

use tally_core::outcome::{ResultState, Signal};
use tally_core::severity::Severity;
use tally_core::store::GrowthPolicy;

use crate::diagnostics::{DiagnosticEntry, DiagnosticLog};
use crate::engine::EngineError;

thread_local! {
    static ACTIVE_RUN: RefCell<Option<RunContext>> = const { RefCell::new(None) };
}

/// Result state and diagnostics of one test run.
#[derive(Debug, Default)]
pub struct RunContext {
    state: ResultState,
    log: DiagnosticLog,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            state: ResultState::Empty,
            log: DiagnosticLog::with_policy(policy),
        }
    }

    /// Start a new run: state back to `Empty`, previous diagnostics released.
    ///
    /// Returns how many diagnostics were released.
    pub fn reset(&mut self) -> usize {
        self.state.reset();
        self.log.clear_owned()
    }

    pub fn state(&self) -> ResultState {
        self.state
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn signal(&mut self, signal: Signal) {
        self.state.apply(signal);
    }

    /// Append a diagnostic. Allocation failure is logged and counted on the log.
    pub fn push(&mut self, severity: Severity, line: u32, message: impl fmt::Display) {
        self.push_entry(DiagnosticEntry::new(severity, line, message));
    }

    fn push_entry(&mut self, entry: DiagnosticEntry) {
        if let Err(err) = self.log.push_entry(entry) {
            tracing::error!(error = %err, dropped = self.log.dropped(), "dropped diagnostic");
        }
    }

    /// Release the log's storage at teardown.
    pub fn release(&mut self) {
        self.state.reset();
        self.log.release();
    }
}

/// Run `body` with `context` installed as the thread's active run.
///
/// The context is moved back into `context` when `body` returns or unwinds.
///
/// ## Errors
/// [`EngineError::RunAlreadyActive`] if another run is already installed on this thread.
pub(crate) fn scoped<T>(context: &mut RunContext, body: impl FnOnce() -> T) -> Result<T, EngineError> {
    ACTIVE_RUN.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(EngineError::RunAlreadyActive);
        }
        *slot = Some(std::mem::take(context));
        Ok(())
    })?;

    let restore = Restore { target: context };
    let out = body();
    drop(restore);
    Ok(out)
}

struct Restore<'a> {
    target: &'a mut RunContext,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        let parked = ACTIVE_RUN.try_with(|slot| slot.borrow_mut().take()).ok().flatten();
        if let Some(context) = parked {
            *self.target = context;
        }
    }
}

/// Whether a test body is currently executing on this thread.
pub fn is_active() -> bool {
    ACTIVE_RUN.with(|slot| slot.borrow().is_some())
}

fn with_active<T>(f: impl FnOnce(&mut RunContext) -> T) -> Option<T> {
    ACTIVE_RUN.with(|slot| slot.borrow_mut().as_mut().map(f))
}

/// Raise a signal on the active run.
pub(crate) fn raise(signal: Signal) {
    if with_active(|context| context.signal(signal)).is_none() {
        tracing::warn!(?signal, "assertion raised outside of a running test; ignored");
    }
}

/// Capture a diagnostic on the active run.
///
/// The message is formatted before the slot is borrowed, so `Display` impls may themselves raise
/// assertions.
pub(crate) fn capture(severity: Severity, line: u32, message: impl fmt::Display) {
    let entry = DiagnosticEntry::new(severity, line, message);
    if with_active(|context| context.push_entry(entry)).is_none() {
        tracing::warn!(%severity, line, "diagnostic raised outside of a running test; ignored");
    }
}
