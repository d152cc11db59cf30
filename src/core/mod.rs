//! Extraction engine.
//!
//! - `collection`: ordered key/value table every stage passes around
//! - `ast`, `template`: program and template source helpers
//! - `source`: a file parsed once for all strategies
//! - `parsers`: extraction strategies
//! - `post_processors`: transforms applied before compiling
//! - `compilers`: output formats
//! - `files`, `task`: input resolution and the extract/merge/write pipeline

pub mod ast;
pub mod collection;
pub mod compilers;
pub mod files;
pub mod parsers;
pub mod post_processors;
pub mod source;
pub mod task;
pub mod template;

pub use collection::{TranslationCollection, TranslationValue};
pub use compilers::{Compile, Compiler, OutputFormat};
pub use parsers::{Extract, ExtractOptions, ParserKind};
pub use post_processors::PostProcessor;
pub use source::ParsedFile;
pub use task::{ExtractTask, ExtractTaskOptions, TaskSummary};
