#![forbid(unsafe_code)]
//! tally: an embeddable test execution engine
//!
//! Host programs register test functions with an [`Engine`], run them in registration order, and
//! get a line-oriented report plus a [`RunSummary`] whose exit code reflects whether any test failed.
//! Test bodies assert through free functions and macros (`check_eq!`, `fail_return!`, `skip!`, ...)
//! that reach the running test through a thread-local run context, so bodies take no arguments.
//!
//! The storage primitives and the result-state machine live in `tally_core`, which has no IO and no
//! global state; they are re-exported here.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module and
//!   `tally_core` enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Test bodies**: a panicking test body is caught by the engine and reported as a `CRITICAL`
//!   failure unless panic isolation is disabled in [`EngineConfig`].

pub mod assert;
pub mod cli;
pub mod config;
pub mod context;
pub mod demo;
pub mod diagnostics;
pub mod engine;
pub mod macros;
pub mod registry;
pub mod report;

pub use config::EngineConfig;
pub use diagnostics::{DiagnosticEntry, DiagnosticLog};
pub use engine::{Engine, EngineError, RunSummary};
pub use registry::{Registry, TestDescriptor};
pub use report::{ConsoleReporter, RunReporter};

pub use tally_core::{GrowableStore, GrowthPolicy, ResultState, RunOutcome, Severity, Signal, StoreError};
