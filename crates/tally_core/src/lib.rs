//! Provide the storage primitive and the pure state vocabulary shared by the tally test engine.
//!
//! This crate is intentionally small and dependency-light:
//! - [`store`]: the generic growable container backing both the test registry and the diagnostic log;
//! - [`outcome`]: the per-run result state, the signals that move it, and its transition table;
//! - [`severity`]: diagnostic severities and their stable display labels.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, and no engine-specific types.
//!   The thread-local run context, reporting and the CLI live in the `tally` crate.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod outcome;
pub mod severity;
pub mod store;

pub use outcome::{ResultState, RunOutcome, Signal, transition};
pub use severity::{Severity, severity_label};
pub use store::{GrowableStore, GrowthPolicy, StoreError};
