//! Extraction strategies.
//!
//! Each strategy recognizes one call shape and turns a single
//! [`ParsedFile`] into a [`TranslationCollection`]:
//! - `pipe`: `{{ 'KEY' | translate }}` in templates
//! - `directive`: `<p translate>KEY</p>` and `[translate]="'KEY'"` in templates
//! - `service`: `this.translate.get('KEY')` in classes holding a translation service
//! - `marker`: `marker('KEY')` anywhere in program source
//!
//! A strategy returns `Ok(None)` when the file is not something it reads,
//! and `Ok(Some(empty))` when it is but nothing was found.

use std::path::Path;

use anyhow::Result;
use enum_dispatch::enum_dispatch;

use super::collection::TranslationCollection;
use super::source::ParsedFile;

pub mod directive;
pub mod marker;
pub mod pipe;
pub mod service;

pub use directive::DirectiveParser;
pub use marker::MarkerParser;
pub use pipe::PipeParser;
pub use service::ServiceParser;

const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm"];
const PROGRAM_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Per-run overrides passed to every strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Type name of the translation service (default `TranslateService`).
    pub service_name: Option<String>,
    /// Extra method name to look for on the service, on top of the defaults.
    pub method_name: Option<String>,
}

#[enum_dispatch]
pub trait Extract {
    fn extract(
        &self,
        file: &ParsedFile,
        options: &ExtractOptions,
    ) -> Result<Option<TranslationCollection>>;
}

/// The closed set of strategies.
#[enum_dispatch(Extract)]
#[derive(Debug, Clone)]
pub enum ParserKind {
    Pipe(PipeParser),
    Directive(DirectiveParser),
    Service(ServiceParser),
    Marker(MarkerParser),
}

impl ParserKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::Pipe(_) => "pipe",
            ParserKind::Directive(_) => "directive",
            ParserKind::Service(_) => "service",
            ParserKind::Marker(_) => "marker",
        }
    }

    /// All strategies in their fixed run order: pipe, directive, service, marker.
    pub fn all(pipe_name: Option<&str>, marker_name: Option<&str>) -> Vec<ParserKind> {
        vec![
            pipe_name.map_or_else(PipeParser::default, PipeParser::new).into(),
            DirectiveParser.into(),
            ServiceParser.into(),
            marker_name.map_or_else(MarkerParser::default, MarkerParser::new).into(),
        ]
    }
}

fn has_extension(file_path: &str, extensions: &[&str]) -> bool {
    Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

pub fn is_template_file(file_path: &str) -> bool {
    has_extension(file_path, TEMPLATE_EXTENSIONS)
}

pub fn is_program_file(file_path: &str) -> bool {
    has_extension(file_path, PROGRAM_EXTENSIONS)
}
