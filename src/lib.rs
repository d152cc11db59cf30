//! translate-extract - translation key extractor for Angular projects
//!
//! Scans templates and TypeScript sources for translation keys used through
//! the `translate` pipe and directive, a translation service, or a marker
//! function, and merges them into JSON or gettext output files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (parsers, post-processors, compilers, task)

pub mod cli;
pub mod config;
pub mod core;
