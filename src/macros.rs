//! Registration and assertion macros.
//!
//! Assertion macros capture `line!()` at the call site. The failing `check*!` macros and
//! [`fail_return!`](crate::fail_return) return from the enclosing test body, so they may only be used
//! in functions or closures returning `()`.

/// Register a test function under its own name.
///
/// ```rust,no_run
/// use tally::{Engine, EngineConfig, ConsoleReporter, register};
///
/// fn adds_up() {
///     tally::check_eq!(1 + 1, 2);
/// }
///
/// let mut engine = Engine::init(ConsoleReporter::stdout(), EngineConfig::default())?;
/// register!(engine, adds_up)?;
/// register!(engine, adds_up, "Arithmetic")?;
/// # Ok::<(), tally::EngineError>(())
/// ```
#[macro_export]
macro_rules! register {
    ($engine:expr, $func:ident) => {
        $engine.register($func, stringify!($func), None, line!(), file!())
    };
    ($engine:expr, $func:ident, $group:expr) => {
        $engine.register($func, stringify!($func), Some($group), line!(), file!())
    };
}

/// Record a passing assertion.
#[macro_export]
macro_rules! succeed {
    () => {
        $crate::assert::record_success()
    };
}

/// Record a failure and keep running the body.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        $crate::assert::record_failure(line!(), format_args!($($arg)+))
    };
}

/// Record a failure and return from the test body.
#[macro_export]
macro_rules! fail_return {
    ($($arg:tt)+) => {{
        $crate::fail!($($arg)+);
        return;
    }};
}

/// Attach a warning to the running test.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::assert::record_warning(line!(), format_args!($($arg)+))
    };
}

/// Skip the rest of the test body.
#[macro_export]
macro_rules! skip {
    () => {{
        $crate::assert::record_skip();
        return;
    }};
}

/// Check a boolean condition, returning from the body when it is false.
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        if $cond {
            $crate::assert::record_success();
        } else {
            $crate::fail_return!("Failed check! {}", stringify!($cond));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if $cond {
            $crate::assert::record_success();
        } else {
            $crate::fail_return!($($arg)+);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_ordering {
    ($op:ident, $left:expr, $right:expr) => {
        if !$crate::assert::compare($crate::assert::CompareOp::$op, &$left, &$right, line!()) {
            return;
        }
    };
}

/// Check `left == right`, returning from the body on failure.
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {
        if !$crate::assert::compare_eq(&$left, &$right, line!()) {
            return;
        }
    };
}

/// Check `left != right`, returning from the body on failure.
#[macro_export]
macro_rules! check_ne {
    ($left:expr, $right:expr $(,)?) => {
        if !$crate::assert::compare_ne(&$left, &$right, line!()) {
            return;
        }
    };
}

/// Check `left < right`, returning from the body on failure.
#[macro_export]
macro_rules! check_lt {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__check_ordering!(Lt, $left, $right)
    };
}

/// Check `left <= right`, returning from the body on failure.
#[macro_export]
macro_rules! check_le {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__check_ordering!(Le, $left, $right)
    };
}

/// Check `left > right`, returning from the body on failure.
#[macro_export]
macro_rules! check_gt {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__check_ordering!(Gt, $left, $right)
    };
}

/// Check `left >= right`, returning from the body on failure.
#[macro_export]
macro_rules! check_ge {
    ($left:expr, $right:expr $(,)?) => {
        $crate::__check_ordering!(Ge, $left, $right)
    };
}

/// Check that two floats are within an absolute tolerance, returning from the body on failure.
#[macro_export]
macro_rules! check_near {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        if !$crate::assert::compare_within_tolerance(
            f64::from($left),
            f64::from($right),
            f64::from($tolerance),
            line!(),
        ) {
            return;
        }
    };
}
