use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use translate_extract::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match translate_extract::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "Error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
