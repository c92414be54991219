//! Execution engine.
//!
//! The engine owns the registry, the run context and a reporter. [`Engine::run`] executes every
//! registered test in registration order:
//!
//! 1. reset the result state to `Empty` and release the previous test's diagnostics;
//! 2. report the test header;
//! 3. invoke the body with the run context installed for assertion call-sites;
//! 4. classify the final state, adding an `"Empty Test"` warning when no signal was raised;
//! 5. report the outcome and the diagnostics in insertion order;
//! 6. count the run as failing only when it ended `Failed`.
//!
//! After the last test the summary is reported and all storage is released once. `run` consumes the
//! engine, so a torn-down engine cannot be run again.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tally_core::outcome::{RunOutcome, Signal};
use tally_core::severity::Severity;
use tally_core::store::StoreError;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::context::{self, RunContext};
use crate::registry::{Registry, TestDescriptor};
use crate::report::RunReporter;

/// Warning attached to a test that raised no signal.
pub const EMPTY_TEST_MESSAGE: &str = "Empty Test";

/// Errors that stop the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to store test data: {0}")]
    Store(#[from] StoreError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("a test run is already active on this thread")]
    RunAlreadyActive,
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    /// Every non-failing run: successes, skips and empty tests.
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub empty: usize,
    /// Diagnostics lost to allocation failure.
    pub dropped_diagnostics: usize,
    pub duration: Duration,
}

impl RunSummary {
    fn record(&mut self, outcome: RunOutcome) {
        self.total += 1;
        match outcome {
            RunOutcome::Failed => self.failed += 1,
            RunOutcome::Success => self.passed += 1,
            RunOutcome::Skipped => {
                self.skipped += 1;
                self.passed += 1;
            }
            RunOutcome::EmptyTest => {
                self.empty += 1;
                self.passed += 1;
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: `0` when no test failed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Registers tests, runs them, and reports through `R`.
pub struct Engine<R: RunReporter> {
    registry: Registry,
    context: RunContext,
    reporter: R,
    config: EngineConfig,
}

impl<R: RunReporter> Engine<R> {
    /// Create an engine and report its initialization.
    pub fn init(mut reporter: R, config: EngineConfig) -> Result<Self, EngineError> {
        if config.banners {
            reporter.on_init()?;
        }
        tracing::debug!(growth = ?config.growth, catch_panics = config.catch_panics, "engine initialized");
        Ok(Self {
            registry: Registry::with_policy(config.growth),
            context: RunContext::with_policy(config.growth),
            reporter,
            config,
        })
    }

    /// Register a test. See [`Registry::register`].
    pub fn register(
        &mut self,
        func: impl Fn() + 'static,
        name: impl Into<String>,
        group: Option<&str>,
        line: u32,
        file: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.registry.register(func, name, group, line, file)?;
        Ok(())
    }

    pub fn registered(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every registered test, report the summary, and tear the engine down.
    #[tracing::instrument(skip_all, fields(test_count = self.registry.len()))]
    pub fn run(mut self) -> Result<RunSummary, EngineError> {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        let Self {
            registry,
            context,
            reporter,
            config,
        } = &mut self;

        for test in registry.iter() {
            let outcome = run_test(test, context, reporter, config.catch_panics)?;
            summary.record(outcome);
            summary.dropped_diagnostics += context.log().dropped();
        }
        summary.duration = start.elapsed();

        if summary.dropped_diagnostics > 0 {
            tracing::warn!(
                dropped = summary.dropped_diagnostics,
                "some diagnostics were lost to allocation failure"
            );
        }
        tracing::debug!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            duration_ms = summary.duration.as_millis() as u64,
            "run complete"
        );

        self.reporter.on_run_complete(&summary)?;
        self.teardown()?;
        Ok(summary)
    }

    fn teardown(&mut self) -> Result<(), EngineError> {
        self.registry.release();
        self.context.release();
        if self.config.banners {
            self.reporter.on_teardown()?;
        }
        tracing::debug!("engine torn down");
        Ok(())
    }
}

fn run_test<R: RunReporter>(
    test: &TestDescriptor,
    context: &mut RunContext,
    reporter: &mut R,
    catch_panics: bool,
) -> Result<RunOutcome, EngineError> {
    let released = context.reset();
    tracing::trace!(released, "released previous diagnostics");

    reporter.on_test_start(test)?;
    tracing::debug!(test = test.name(), group = test.group(), "running test");

    if let Some(panic_message) = context::scoped(context, || invoke(test, catch_panics))? {
        context.signal(Signal::Fail);
        context.push(Severity::Critical, 0, format_args!("panicked: {panic_message}"));
    }

    let outcome = context.state().finish();
    if outcome == RunOutcome::EmptyTest {
        context.push(Severity::Warning, 0, EMPTY_TEST_MESSAGE);
    }
    tracing::debug!(test = test.name(), ?outcome, diagnostics = context.log().len(), "test finished");

    reporter.on_test_complete(test, outcome, context.log())?;
    Ok(outcome)
}

/// Call the body, returning the panic message if it unwound.
fn invoke(test: &TestDescriptor, catch_panics: bool) -> Option<String> {
    if !catch_panics {
        test.call();
        return None;
    }
    panic::catch_unwind(AssertUnwindSafe(|| test.call()))
        .err()
        .map(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assert::{record_failure, record_skip, record_success, record_warning};
    use crate::report::ConsoleReporter;
    use tally_core::store::GrowthPolicy;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet() -> EngineConfig {
        EngineConfig::new().with_banners(false)
    }

    fn console() -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::new(Vec::new())
    }

    #[test]
    fn test_summary_tally() {
        let mut reporter = console();
        let mut engine = Engine::init(&mut reporter, quiet()).unwrap();
        engine.register(record_success, "pass", None, 1, "f.rs").unwrap();
        engine.register(|| record_failure(2, "no"), "fail", None, 2, "f.rs").unwrap();
        engine.register(record_skip, "skip", None, 3, "f.rs").unwrap();
        engine.register(|| {}, "empty", None, 4, "f.rs").unwrap();

        let summary = engine.run().unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_zero_tests_succeed() {
        let mut reporter = console();
        let engine = Engine::init(&mut reporter, EngineConfig::default()).unwrap();
        let summary = engine.run().unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.is_success());
        assert_eq!(summary.exit_code(), 0);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("Run a total of 0 tests, with a successrate of 0/0"));
    }

    #[test]
    fn test_each_run_starts_clean() {
        let observed = Rc::new(RefCell::new(Vec::new()));

        let mut reporter = console();
        let mut engine = Engine::init(&mut reporter, quiet()).unwrap();
        engine
            .register(
                || {
                    record_warning(1, "carried?");
                    record_failure(2, "first test fails");
                },
                "first",
                None,
                1,
                "f.rs",
            )
            .unwrap();
        let sink = Rc::clone(&observed);
        engine
            .register(
                move || {
                    sink.borrow_mut().push(context::is_active());
                    record_success();
                },
                "second",
                None,
                2,
                "f.rs",
            )
            .unwrap();

        let summary = engine.run().unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(*observed.borrow(), vec![true]);

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let second = output.split("[FUNC: second]").nth(1).unwrap();
        assert!(second.starts_with(" - Success!"));
        assert!(!second.contains("carried?"));
    }

    #[test]
    fn test_panicking_body_is_isolated() {
        let mut reporter = console();
        let mut engine = Engine::init(&mut reporter, quiet()).unwrap();
        engine.register(|| panic!("kaboom"), "explodes", None, 1, "f.rs").unwrap();
        engine.register(record_success, "after", None, 2, "f.rs").unwrap();

        let summary = engine.run().unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, 1);

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("f.rs:0 (explodes) [CRITICAL] panicked: kaboom"));
        assert!(output.contains("[FUNC: after] - Success!"));
    }

    #[test]
    fn test_panic_message_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_run_inside_a_running_test_is_rejected() {
        let nested_result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&nested_result);

        let mut reporter = console();
        let mut engine = Engine::init(&mut reporter, quiet()).unwrap();
        engine
            .register(
                move || {
                    let mut inner = Engine::init(ConsoleReporter::new(Vec::new()), EngineConfig::new().with_banners(false))
                        .unwrap();
                    inner.register(|| {}, "inner", None, 1, "f.rs").unwrap();
                    let rejected = matches!(inner.run(), Err(EngineError::RunAlreadyActive));
                    *sink.borrow_mut() = Some(rejected);
                    record_success();
                },
                "outer",
                None,
                1,
                "f.rs",
            )
            .unwrap();

        engine.run().unwrap();
        assert_eq!(*nested_result.borrow(), Some(true));
    }

    fn unallocatable() -> GrowthPolicy {
        GrowthPolicy::new(1 << 60, 2).unwrap()
    }

    #[test]
    fn test_register_reports_allocation_failure() {
        let config = quiet().with_growth(unallocatable());
        let mut engine = Engine::init(console(), config).unwrap();

        let err = engine.register(record_success, "t", None, 1, "f.rs").unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::AllocationFailed { .. })));
        assert!(err.to_string().starts_with("failed to store test data: "));
        assert_eq!(engine.registered(), 0);
    }

    #[test]
    fn test_dropped_diagnostics_are_counted() {
        let mut registry = Registry::new();
        registry.register(|| record_failure(5, "lost"), "lossy", None, 1, "f.rs").unwrap();
        registry.register(record_success, "clean", None, 2, "f.rs").unwrap();

        let mut reporter = console();
        let engine = Engine {
            registry,
            context: RunContext::with_policy(unallocatable()),
            reporter: &mut reporter,
            config: quiet(),
        };
        let summary = engine.run().unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.dropped_diagnostics, 1);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("[FUNC: lossy] - Failed!\n"));
        assert!(!output.contains("lost"));
    }

    /// Fails on the second test header and counts every hook that did run.
    #[derive(Default)]
    struct BrokenPipe {
        starts: usize,
        teardowns: usize,
    }

    impl RunReporter for BrokenPipe {
        fn on_test_start(&mut self, _test: &TestDescriptor) -> std::io::Result<()> {
            self.starts += 1;
            if self.starts == 2 {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            Ok(())
        }

        fn on_test_complete(
            &mut self,
            _test: &TestDescriptor,
            _outcome: RunOutcome,
            _diagnostics: &crate::diagnostics::DiagnosticLog,
        ) -> std::io::Result<()> {
            Ok(())
        }

        fn on_run_complete(&mut self, _summary: &RunSummary) -> std::io::Result<()> {
            Ok(())
        }

        fn on_teardown(&mut self) -> std::io::Result<()> {
            self.teardowns += 1;
            Ok(())
        }
    }

    #[test]
    fn test_reporter_failure_aborts_the_run() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let mut reporter = BrokenPipe::default();
        let mut engine = Engine::init(&mut reporter, EngineConfig::default()).unwrap();
        for name in ["first", "second", "third"] {
            let sink = Rc::clone(&ran);
            engine
                .register(move || sink.borrow_mut().push(name), name, None, 1, "f.rs")
                .unwrap();
        }

        let err = engine.run().unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
        assert_eq!(*ran.borrow(), vec!["first"]);
        assert_eq!(reporter.starts, 2);
        assert_eq!(reporter.teardowns, 0);
    }
}
