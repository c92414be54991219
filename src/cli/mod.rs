//! CLI module for the tally test engine
//!
//! ## Commands
//!
//! - `demo` - Run the bundled demonstration suite (default when no subcommand is given)
//! - `labels` - Print the diagnostic severity vocabulary
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand};
use tally_core::store::{DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_CAPACITY, GrowthPolicy};

use crate::config::EngineConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// An embeddable test execution engine
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version = VERSION)]
#[command(about = "Run registered tests and report their outcomes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bundled demonstration suite
    Demo {
        /// Omit the init and teardown lines
        #[arg(long)]
        no_banner: bool,
        /// Capacity of the first allocation of the registry and diagnostic log
        #[arg(long, value_name = "N", default_value_t = DEFAULT_INITIAL_CAPACITY)]
        initial_capacity: usize,
        /// Multiplier applied when a full store grows
        #[arg(long, value_name = "N", default_value_t = DEFAULT_GROWTH_FACTOR)]
        growth_factor: usize,
    },

    /// Print the diagnostic severity labels
    Labels,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Demo {
            no_banner,
            initial_capacity,
            growth_factor,
        }) => {
            let config = demo_config(no_banner, initial_capacity, growth_factor)?;
            commands::run_demo(config)
        }
        Some(Command::Labels) => commands::print_labels(),
        None => commands::run_demo(EngineConfig::default()),
    }
}

fn demo_config(no_banner: bool, initial_capacity: usize, growth_factor: usize) -> CliResult<EngineConfig> {
    let growth = GrowthPolicy::new(initial_capacity, growth_factor)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;
    Ok(EngineConfig::new().with_growth(growth).with_banners(!no_banner))
}

// ============================================================================
// Tests
// ============================================================================
