//! Command-line layer: argument parsing, settings resolution, reporting.
//!
//! Kept separate from `core` so the extractor can be used as a library.

use anyhow::Result;

pub mod args;
mod exit_status;
mod report;
pub mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose;

    let summary = run::run(args)?;
    report::print(&summary, verbose);

    Ok(ExitStatus::Success)
}
