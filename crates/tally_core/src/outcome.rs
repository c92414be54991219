//! Per-run result state and its transition table.
//!
//! A running test body raises [`Signal`]s through the assertion surface. The engine folds them into
//! a [`ResultState`] with [`transition`], then reads the final classification as a [`RunOutcome`].
//!
//! ## Transition table
//!
//! | current \ signal | `Pass`    | `Fail`    | `Skip`    |
//! |------------------|-----------|-----------|-----------|
//! | `Empty`          | `Success` | `Failed`  | `Skipped` |
//! | `Success`        | `Success` | `Failed`  | `Skipped` |
//! | `Failed`         | `Failed`  | `Failed`  | `Skipped` |
//! | `Skipped`        | `Skipped` | `Skipped` | `Skipped` |
//!
//! ## Notes
//! - `Failed` is sticky against `Pass`: a later success never undoes an earlier failure.
//! - `Skipped` is terminal. The skip macro returns from the body, so anything raised after it can only
//!   come from the function API and is ignored.

/// Current outcome of the test body that is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultState {
    #[default]
    Empty,
    Success,
    Failed,
    Skipped,
}

/// An event raised by an assertion call-site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Pass,
    Fail,
    Skip,
}

/// Final classification of one test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Success,
    Failed,
    Skipped,
    /// The body finished without raising any signal. Counted as a pass, reported with a warning.
    EmptyTest,
}

/// Fold one signal into the current state.
///
/// ## Examples
/// ```rust
/// use tally_core::outcome::{transition, ResultState, Signal};
///
/// let state = transition(ResultState::Empty, Signal::Fail);
/// assert_eq!(transition(state, Signal::Pass), ResultState::Failed);
/// ```
pub const fn transition(current: ResultState, signal: Signal) -> ResultState {
    use ResultState::*;

    match (current, signal) {
        (Skipped, _) => Skipped,
        (_, Signal::Skip) => Skipped,

        (Empty, Signal::Pass) => Success,
        (Success, Signal::Pass) => Success,
        (Failed, Signal::Pass) => Failed,

        (Empty | Success | Failed, Signal::Fail) => Failed,
    }
}

impl ResultState {
    pub fn apply(&mut self, signal: Signal) {
        *self = transition(*self, signal);
    }

    pub fn reset(&mut self) {
        *self = ResultState::Empty;
    }

    /// Classify the state left behind once the body returned.
    pub const fn finish(self) -> RunOutcome {
        match self {
            ResultState::Empty => RunOutcome::EmptyTest,
            ResultState::Success => RunOutcome::Success,
            ResultState::Failed => RunOutcome::Failed,
            ResultState::Skipped => RunOutcome::Skipped,
        }
    }
}

impl RunOutcome {
    /// Only failed runs count against the suite.
    pub const fn is_failing(self) -> bool {
        matches!(self, RunOutcome::Failed)
    }

    /// Word printed after the test header (`- <marker>!`).
    pub const fn marker(self) -> &'static str {
        match self {
            RunOutcome::Success | RunOutcome::EmptyTest => "Success",
            RunOutcome::Failed => "Failed",
            RunOutcome::Skipped => "Skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [ResultState; 4] = [
        ResultState::Empty,
        ResultState::Success,
        ResultState::Failed,
        ResultState::Skipped,
    ];

    #[test]
    fn test_first_pass_sets_success() {
        assert_eq!(transition(ResultState::Empty, Signal::Pass), ResultState::Success);
    }

    #[test]
    fn test_pass_never_overrides_failure() {
        let mut state = ResultState::Empty;
        state.apply(Signal::Fail);
        for _ in 0..5 {
            state.apply(Signal::Pass);
        }
        assert_eq!(state, ResultState::Failed);
    }

    #[test]
    fn test_fail_overrides_success() {
        let mut state = ResultState::Empty;
        state.apply(Signal::Pass);
        state.apply(Signal::Fail);
        assert_eq!(state, ResultState::Failed);
    }

    #[test]
    fn test_skip_from_any_state() {
        for state in STATES {
            assert_eq!(transition(state, Signal::Skip), ResultState::Skipped);
        }
    }

    #[test]
    fn test_skipped_is_terminal() {
        for signal in [Signal::Pass, Signal::Fail, Signal::Skip] {
            assert_eq!(transition(ResultState::Skipped, signal), ResultState::Skipped);
        }
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut state = ResultState::Failed;
        state.reset();
        assert_eq!(state, ResultState::Empty);
        assert_eq!(ResultState::default(), ResultState::Empty);
    }

    #[test]
    fn test_finish_classification() {
        assert_eq!(ResultState::Empty.finish(), RunOutcome::EmptyTest);
        assert_eq!(ResultState::Success.finish(), RunOutcome::Success);
        assert_eq!(ResultState::Failed.finish(), RunOutcome::Failed);
        assert_eq!(ResultState::Skipped.finish(), RunOutcome::Skipped);
    }

    #[test]
    fn test_only_failed_is_failing() {
        assert!(RunOutcome::Failed.is_failing());
        assert!(!RunOutcome::Success.is_failing());
        assert!(!RunOutcome::Skipped.is_failing());
        assert!(!RunOutcome::EmptyTest.is_failing());
    }

    #[test]
    fn test_empty_test_prints_success_marker() {
        assert_eq!(RunOutcome::EmptyTest.marker(), "Success");
        assert_eq!(RunOutcome::Failed.marker(), "Failed");
        assert_eq!(RunOutcome::Skipped.marker(), "Skipped");
    }
}
