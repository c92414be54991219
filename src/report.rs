//! Run reporting.
//!
//! The engine drives a [`RunReporter`] through the lifecycle of a run. [`ConsoleReporter`] renders
//! the line-oriented, human-readable format:
//!
//! ```text
//! Initialized tally!
//!
//! lexer.rs: [GROUP: Lexer] [FUNC: lexer_plus] - Success!
//!
//! lexer.rs: [GROUP: Default] [FUNC: broken] - Failed!
//! tests/lexer.rs:31 (broken) [ERROR] Failed equal comparison! left: 1, right: 2
//!
//! Run a total of 2 tests, with a successrate of 1/2
//! Destroyed tally!
//! ```

use std::io::{self, Write};

use tally_core::outcome::RunOutcome;

use crate::diagnostics::DiagnosticLog;
use crate::engine::RunSummary;
use crate::registry::TestDescriptor;

pub const INIT_BANNER: &str = "Initialized tally!";
pub const TEARDOWN_BANNER: &str = "Destroyed tally!";

/// Receives the events of a run, in order.
pub trait RunReporter {
    /// Called once when the engine is initialized
    fn on_init(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called before a test body runs
    fn on_test_start(&mut self, test: &TestDescriptor) -> io::Result<()>;

    /// Called after a test body returned, with the diagnostics it produced
    fn on_test_complete(
        &mut self,
        test: &TestDescriptor,
        outcome: RunOutcome,
        diagnostics: &DiagnosticLog,
    ) -> io::Result<()>;

    /// Called once after every test ran
    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()>;

    /// Called once after storage was released
    fn on_teardown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: RunReporter + ?Sized> RunReporter for &mut R {
    fn on_init(&mut self) -> io::Result<()> {
        (**self).on_init()
    }

    fn on_test_start(&mut self, test: &TestDescriptor) -> io::Result<()> {
        (**self).on_test_start(test)
    }

    fn on_test_complete(
        &mut self,
        test: &TestDescriptor,
        outcome: RunOutcome,
        diagnostics: &DiagnosticLog,
    ) -> io::Result<()> {
        (**self).on_test_complete(test, outcome, diagnostics)
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        (**self).on_run_complete(summary)
    }

    fn on_teardown(&mut self) -> io::Result<()> {
        (**self).on_teardown()
    }
}

/// Plain-text console reporter.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RunReporter for ConsoleReporter<W> {
    fn on_init(&mut self) -> io::Result<()> {
        writeln!(self.out, "{INIT_BANNER}")
    }

    fn on_test_start(&mut self, test: &TestDescriptor) -> io::Result<()> {
        // No newline: the result marker completes the header line.
        write!(
            self.out,
            "\n{}: [GROUP: {}] [FUNC: {}] ",
            test.file_name(),
            test.group(),
            test.name()
        )?;
        // Anything the body prints lands after the header.
        self.out.flush()
    }

    fn on_test_complete(
        &mut self,
        test: &TestDescriptor,
        outcome: RunOutcome,
        diagnostics: &DiagnosticLog,
    ) -> io::Result<()> {
        writeln!(self.out, "- {}!", outcome.marker())?;
        for entry in diagnostics {
            writeln!(self.out, "{}", entry.render(test.file(), test.name()))?;
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        write!(
            self.out,
            "\nRun a total of {} tests, with a successrate of {}/{}\n",
            summary.total, summary.passed, summary.total
        )?;
        self.out.flush()
    }

    fn on_teardown(&mut self) -> io::Result<()> {
        writeln!(self.out, "{TEARDOWN_BANNER}")?;
        self.out.flush()
    }
}
