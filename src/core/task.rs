//! Extraction task.
//!
//! Two phases:
//! 1. Extract: every resolved file is read and run through every parser in
//!    parallel; per-file results are merged back in file order.
//! 2. Write: for every output, the existing file (unless replacing) is merged
//!    in, post-processors run, and the result is compiled. Files are only
//!    written once every output compiled successfully.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::{
    collection::TranslationCollection,
    compilers::{Compile, Compiler, DEFAULT_INDENTATION, OutputFormat},
    files::{default_patterns, resolve_files},
    parsers::{Extract, ExtractOptions, ParserKind},
    post_processors::{self, PostProcessor},
    source::ParsedFile,
};

/// File name used when an output path is a directory.
pub const DEFAULT_OUTPUT_FILE_STEM: &str = "strings";

#[derive(Debug, Clone)]
pub struct ExtractTaskOptions {
    /// Discard existing output instead of merging into it.
    pub replace: bool,
    /// Glob patterns relative to each input root.
    pub patterns: Vec<String>,
    pub extract: ExtractOptions,
}

impl Default for ExtractTaskOptions {
    fn default() -> Self {
        Self {
            replace: false,
            patterns: default_patterns(),
            extract: ExtractOptions::default(),
        }
    }
}

/// A file's contents, already loaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub key_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub key_count: usize,
}

/// What a run did, for reporting.
#[derive(Debug, Default)]
pub struct TaskSummary {
    pub files: Vec<FileSummary>,
    /// Unique keys found across all files.
    pub key_count: usize,
    pub outputs: Vec<OutputSummary>,
    /// `root + pattern` combinations that matched nothing.
    pub unmatched_patterns: Vec<String>,
    pub skipped_count: usize,
}

#[derive(Debug, Clone)]
pub struct ExtractTask {
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
    options: ExtractTaskOptions,
    parsers: Vec<ParserKind>,
    post_processors: Vec<PostProcessor>,
    compiler: Compiler,
}

impl ExtractTask {
    pub fn new(inputs: Vec<PathBuf>, outputs: Vec<PathBuf>, options: ExtractTaskOptions) -> Self {
        Self {
            inputs,
            outputs,
            options,
            parsers: Vec::new(),
            post_processors: Vec::new(),
            compiler: Compiler::new(OutputFormat::Json, DEFAULT_INDENTATION),
        }
    }

    pub fn set_parsers(mut self, parsers: Vec<ParserKind>) -> Self {
        self.parsers = parsers;
        self
    }

    pub fn set_post_processors(mut self, post_processors: Vec<PostProcessor>) -> Self {
        self.post_processors = post_processors;
        self
    }

    pub fn set_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Parse one file once, run every parser over it and merge their results
    /// in parser order.
    pub fn extract_file(&self, file_path: &str, source: &str) -> Result<TranslationCollection> {
        let file = ParsedFile::parse(source, file_path)?;
        let mut collection = TranslationCollection::new();
        for parser in &self.parsers {
            if let Some(found) = parser.extract(&file, &self.options.extract)? {
                collection = collection.merge(&found);
            }
        }
        Ok(collection)
    }

    /// Extract from in-memory sources, merging in the given order.
    pub fn extract_sources(&self, sources: &[SourceFile]) -> Result<TranslationCollection> {
        let results: Vec<Result<TranslationCollection>> = sources
            .par_iter()
            .map(|file| self.extract_file(&file.path, &file.source))
            .collect();

        let mut extracted = TranslationCollection::new();
        for result in results {
            extracted = extracted.merge(&result?);
        }
        Ok(extracted)
    }

    pub fn execute(&self) -> Result<TaskSummary> {
        post_processors::validate(&self.post_processors)?;

        let resolved = resolve_files(&self.inputs, &self.options.patterns)?;

        // Parallel read + extract; results come back in file order
        let results: Vec<(PathBuf, Result<TranslationCollection>)> = resolved
            .files
            .par_iter()
            .map(|path| {
                let result = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read file: {}", path.display()))
                    .and_then(|source| self.extract_file(&path.to_string_lossy(), &source));
                (path.clone(), result)
            })
            .collect();

        let mut extracted = TranslationCollection::new();
        let mut files = Vec::with_capacity(results.len());
        for (path, result) in results {
            let collection = result?;
            files.push(FileSummary {
                path,
                key_count: collection.len(),
            });
            extracted = extracted.merge(&collection);
        }

        let compiled = self
            .outputs
            .iter()
            .map(|output| self.compile_output(output, &extracted))
            .collect::<Result<Vec<_>>>()?;

        let mut outputs = Vec::with_capacity(compiled.len());
        for (path, content, key_count) in compiled {
            write_output(&path, &content)?;
            outputs.push(OutputSummary { path, key_count });
        }

        Ok(TaskSummary {
            files,
            key_count: extracted.len(),
            outputs,
            unmatched_patterns: resolved.unmatched,
            skipped_count: resolved.skipped_count,
        })
    }

    /// The file an output path refers to: directories get `strings.<ext>`.
    pub fn output_file(&self, output: &Path) -> PathBuf {
        if output.is_dir() {
            output.join(format!(
                "{}.{}",
                DEFAULT_OUTPUT_FILE_STEM,
                self.compiler.extension()
            ))
        } else {
            output.to_path_buf()
        }
    }

    fn compile_output(
        &self,
        output: &Path,
        extracted: &TranslationCollection,
    ) -> Result<(PathBuf, String, usize)> {
        let path = self.output_file(output);
        let existing = self.read_existing(&path)?;

        let draft = extracted.merge(&existing);
        let processed = post_processors::apply(&self.post_processors, draft, extracted, &existing);
        // Unset values are written empty unless they are meant to stay null.
        let final_collection = if self.post_processors.contains(&PostProcessor::NullAsDefaultValue) {
            processed
        } else {
            processed.map_values(|_, value| Some(value.clone().unwrap_or_default()))
        };

        let content = self
            .compiler
            .compile(&final_collection)
            .with_context(|| format!("Failed to compile {}", path.display()))?;
        Ok((path, content, final_collection.len()))
    }

    fn read_existing(&self, path: &Path) -> Result<TranslationCollection> {
        if self.options.replace || !path.is_file() {
            return Ok(TranslationCollection::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read existing output: {}", path.display()))?;
        self.compiler
            .parse(&contents)
            .with_context(|| format!("Failed to parse existing output: {}", path.display()))
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
