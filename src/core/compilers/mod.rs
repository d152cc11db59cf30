//! Output formats.
//!
//! A compiler turns a collection into file contents and reads existing
//! output back into a collection, so new keys can be merged into it.

use anyhow::Result;
use clap::ValueEnum;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::collection::TranslationCollection;

pub mod json;
pub mod namespaced_json;
pub mod pot;

pub use json::JsonCompiler;
pub use namespaced_json::NamespacedJsonCompiler;
pub use pot::PotCompiler;

pub const DEFAULT_INDENTATION: &str = "\t";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    NamespacedJson,
    Pot,
}

#[enum_dispatch]
pub trait Compile {
    /// File extension used when the output path is a directory.
    fn extension(&self) -> &'static str;

    fn compile(&self, collection: &TranslationCollection) -> Result<String>;

    fn parse(&self, contents: &str) -> Result<TranslationCollection>;
}

#[enum_dispatch(Compile)]
#[derive(Debug, Clone)]
pub enum Compiler {
    Json(JsonCompiler),
    NamespacedJson(NamespacedJsonCompiler),
    Pot(PotCompiler),
}

impl Compiler {
    pub fn new(format: OutputFormat, indentation: &str) -> Self {
        match format {
            OutputFormat::Json => JsonCompiler::new(indentation).into(),
            OutputFormat::NamespacedJson => NamespacedJsonCompiler::new(indentation).into(),
            OutputFormat::Pot => PotCompiler.into(),
        }
    }
}
