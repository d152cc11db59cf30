//! CLI argument definitions using clap.
//!
//! Every option can also be set in `.extractrc.json`; values given here win,
//! and boolean flags are combined with the config file's.

use std::path::PathBuf;

use clap::Parser;

use crate::core::compilers::OutputFormat;

#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Paths you would like to extract strings from
    #[arg(short, long, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Paths where you would like to save extracted strings (a directory gets `strings.<ext>`)
    #[arg(short, long, num_args = 1..)]
    pub output: Vec<PathBuf>,

    /// Extract strings from files matching these glob patterns, relative to each input
    #[arg(short, long, num_args = 1..)]
    pub patterns: Vec<String>,

    /// Format of the output files
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Indentation used in JSON output
    #[arg(long, visible_alias = "fi")]
    pub format_indentation: Option<String>,

    /// Replace the contents of output files instead of merging into them
    #[arg(short, long)]
    pub replace: bool,

    /// Sort keys in alphabetical order
    #[arg(short, long)]
    pub sort: bool,

    /// Remove keys that are no longer found in the sources
    #[arg(short, long)]
    pub clean: bool,

    /// Use the key as the value of untranslated keys
    #[arg(short, long)]
    pub key_as_default_value: bool,

    /// Write null as the value of untranslated keys
    #[arg(short, long, conflicts_with = "key_as_default_value")]
    pub null_as_default_value: bool,

    /// Type name of the translation service
    #[arg(long, visible_alias = "sn")]
    pub service_name: Option<String>,

    /// Additional method name to look for on the translation service
    #[arg(long, visible_alias = "mn")]
    pub method_name: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
