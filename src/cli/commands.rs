//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};

use tally_core::severity::Severity;

use crate::config::EngineConfig;
use crate::demo;
use crate::engine::{Engine, EngineError};
use crate::report::{ConsoleReporter, RunReporter};

use super::{CliError, CliResult, ExitCode};

/// Run a suite on the console and map its summary to an exit code.
///
/// The console report already explains any failure, so a failing run returns an error with an
/// empty message.
#[tracing::instrument(skip_all)]
pub fn run_suite<R, F>(reporter: R, config: EngineConfig, register: F) -> CliResult<ExitCode>
where
    R: RunReporter,
    F: FnOnce(&mut Engine<R>) -> Result<(), EngineError>,
{
    let mut engine = Engine::init(reporter, config).map_err(engine_failure)?;
    register(&mut engine).map_err(engine_failure)?;
    let summary = engine.run().map_err(engine_failure)?;

    match ExitCode(summary.exit_code()) {
        ExitCode::SUCCESS => Ok(ExitCode::SUCCESS),
        code => Err(CliError::new("", code)),
    }
}

/// Run the bundled demonstration suite.
pub fn run_demo(config: EngineConfig) -> CliResult<ExitCode> {
    run_suite(ConsoleReporter::stdout(), config, demo::register_demo_suite)
}

/// Print every severity with its label, one per line.
pub fn print_labels() -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    write_labels(&mut out).map_err(|e| CliError::failure(format!("Error writing labels: {e}")))?;
    Ok(ExitCode::SUCCESS)
}

fn write_labels(out: &mut impl Write) -> io::Result<()> {
    for severity in Severity::ALL {
        writeln!(out, "{} {}", severity as u8, severity.as_str())?;
    }
    Ok(())
}

fn engine_failure(err: EngineError) -> CliError {
    tracing::error!(error = %err, "engine failed");
    CliError::failure(format!("Error: {err}"))
}
