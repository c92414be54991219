//! Assertion surface for test bodies.
//!
//! These functions reach the running test through the thread-local run context, so test bodies need
//! no handle. Each reduces to a result-state signal plus, for failures and warnings, one diagnostic.
//!
//! The macros in this crate (`check_eq!`, `fail_return!`, `skip!`, ...) wrap these functions, capture
//! `line!()`, and return early from the test body where the assertion requires it.

use std::fmt::{self, Debug};

use tally_core::outcome::Signal;
use tally_core::severity::Severity;

use crate::context;

/// Record a passing assertion.
pub fn record_success() {
    context::raise(Signal::Pass);
}

/// Record a failed assertion with an `ERROR` diagnostic.
pub fn record_failure(line: u32, message: impl fmt::Display) {
    context::raise(Signal::Fail);
    context::capture(Severity::Error, line, message);
}

/// Record a failure with a `CRITICAL` diagnostic.
pub fn record_critical(line: u32, message: impl fmt::Display) {
    context::raise(Signal::Fail);
    context::capture(Severity::Critical, line, message);
}

/// Attach a `WARNING` diagnostic without changing the outcome.
pub fn record_warning(line: u32, message: impl fmt::Display) {
    context::capture(Severity::Warning, line, message);
}

/// Mark the running test as skipped. The caller is expected to return right after.
pub fn record_skip() {
    context::raise(Signal::Skip);
}

/// A comparison operator used by the `check_*!` macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Name used in failure messages (`Failed <name> comparison!`).
    pub const fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "equal",
            CompareOp::Ne => "not equal",
            CompareOp::Lt => "less",
            CompareOp::Le => "less equal",
            CompareOp::Gt => "greater",
            CompareOp::Ge => "greater equal",
        }
    }

    pub fn holds<L, R>(self, left: &L, right: &R) -> bool
    where
        L: PartialOrd<R> + ?Sized,
        R: ?Sized,
    {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }
}

/// Compare two ordered values and record the outcome.
///
/// Returns `true` when `left <op> right` holds. On failure the diagnostic renders both operands with
/// `Debug`.
pub fn compare<L, R>(op: CompareOp, left: &L, right: &R, line: u32) -> bool
where
    L: PartialOrd<R> + Debug + ?Sized,
    R: Debug + ?Sized,
{
    report(op.holds(left, right), op, left, right, line)
}

/// Equality check for values that are not ordered.
pub fn compare_eq<L, R>(left: &L, right: &R, line: u32) -> bool
where
    L: PartialEq<R> + Debug + ?Sized,
    R: Debug + ?Sized,
{
    report(left == right, CompareOp::Eq, left, right, line)
}

/// Inequality check for values that are not ordered.
pub fn compare_ne<L, R>(left: &L, right: &R, line: u32) -> bool
where
    L: PartialEq<R> + Debug + ?Sized,
    R: Debug + ?Sized,
{
    report(left != right, CompareOp::Ne, left, right, line)
}

fn report<L, R>(passed: bool, op: CompareOp, left: &L, right: &R, line: u32) -> bool
where
    L: Debug + ?Sized,
    R: Debug + ?Sized,
{
    if passed {
        record_success();
    } else {
        record_failure(
            line,
            format_args!("Failed {} comparison! left: {:?}, right: {:?}", op.name(), left, right),
        );
    }
    passed
}

/// Check that `|left - right| <= tolerance` and record the outcome.
///
/// NaN operands never compare within tolerance.
pub fn compare_within_tolerance(left: f64, right: f64, tolerance: f64, line: u32) -> bool {
    let passed = (left - right).abs() <= tolerance;
    if passed {
        record_success();
    } else {
        record_failure(
            line,
            format_args!("Failed tolerance comparison! left: {left:?}, right: {right:?}, tolerance: {tolerance:?}"),
        );
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_holds() {
        assert!(CompareOp::Eq.holds(&1, &1));
        assert!(CompareOp::Ne.holds(&1, &2));
        assert!(CompareOp::Lt.holds(&1, &2));
        assert!(CompareOp::Le.holds(&2, &2));
        assert!(CompareOp::Gt.holds(&3, &2));
        assert!(CompareOp::Ge.holds(&2, &2));
        assert!(!CompareOp::Lt.holds(&2, &2));
    }

    #[test]
    fn test_compare_op_names() {
        assert_eq!(CompareOp::Eq.name(), "equal");
        assert_eq!(CompareOp::Ge.name(), "greater equal");
        assert_eq!(CompareOp::Ne.symbol(), "!=");
    }

    #[test]
    fn test_helpers_return_outcome_outside_a_run() {
        assert!(compare(CompareOp::Lt, &1, &2, line!()));
        assert!(!compare_eq("a", "b", line!()));
        assert!(compare_ne(&[1, 2][..], &[2, 1][..], line!()));
        assert!(compare_within_tolerance(1.0, 1.0000005, 1e-6, line!()));
        assert!(!compare_within_tolerance(1.0, 1.0000005, 1e-9, line!()));
        assert!(!compare_within_tolerance(f64::NAN, f64::NAN, 1.0, line!()));
    }
}
