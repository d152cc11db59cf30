//! Settings resolution and task wiring.
//!
//! Priority for every setting: command-line argument > `.extractrc.json` > default.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

use super::args::Arguments;
use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        compilers::{Compiler, DEFAULT_INDENTATION, OutputFormat},
        files::default_patterns,
        parsers::{ExtractOptions, ParserKind},
        post_processors::PostProcessor,
        task::{ExtractTask, ExtractTaskOptions, TaskSummary},
    },
};

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub patterns: Vec<String>,
    pub format: OutputFormat,
    pub indentation: String,
    pub replace: bool,
    pub sort: bool,
    pub clean: bool,
    pub key_as_default_value: bool,
    pub null_as_default_value: bool,
    pub service_name: Option<String>,
    pub method_name: Option<String>,
    pub pipe_name: Option<String>,
    pub marker_name: Option<String>,
}

impl Settings {
    /// Combine arguments with config. Relative config paths are resolved
    /// against the directory holding the config file.
    pub fn resolve(args: Arguments, config: Config, config_dir: &Path) -> Self {
        let from_config = |paths: Vec<String>| -> Vec<PathBuf> {
            paths
                .into_iter()
                .map(|p| {
                    let path = PathBuf::from(p);
                    if path.is_absolute() {
                        path
                    } else {
                        config_dir.join(path.strip_prefix(".").unwrap_or(&path))
                    }
                })
                .collect()
        };

        let inputs = if !args.input.is_empty() {
            args.input
        } else if !config.input.is_empty() {
            from_config(config.input)
        } else {
            vec![PathBuf::from(".")]
        };

        let outputs = if !args.output.is_empty() {
            args.output
        } else {
            from_config(config.output)
        };

        let patterns = if !args.patterns.is_empty() {
            args.patterns
        } else {
            config.patterns.unwrap_or_else(default_patterns)
        };

        Self {
            inputs,
            outputs,
            patterns,
            format: args.format.or(config.format).unwrap_or_default(),
            indentation: args
                .format_indentation
                .or(config.format_indentation)
                .unwrap_or_else(|| DEFAULT_INDENTATION.to_string()),
            replace: args.replace || config.replace,
            sort: args.sort || config.sort,
            clean: args.clean || config.clean,
            key_as_default_value: args.key_as_default_value || config.key_as_default_value,
            null_as_default_value: args.null_as_default_value || config.null_as_default_value,
            service_name: args.service_name.or(config.service_name),
            method_name: args.method_name.or(config.method_name),
            pipe_name: config.pipe_name,
            marker_name: config.marker_name,
        }
    }

    /// Reject settings that can't produce a run. Nothing has been read yet.
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                bail!("The path you supplied was not found: '{}'", input.display());
            }
            if !input.is_dir() {
                bail!("The path you supplied is not a directory: '{}'", input.display());
            }
        }

        if self.outputs.is_empty() {
            bail!(
                "No output path given. Use --output or set 'output' in {}",
                CONFIG_FILE_NAME
            );
        }

        if self.key_as_default_value && self.null_as_default_value {
            bail!("--key-as-default-value and --null-as-default-value cannot be used together");
        }

        for pattern in &self.patterns {
            glob::Pattern::new(pattern.trim_start_matches('/'))
                .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;
        }

        Ok(())
    }

    /// Fixed order: purge, then the default-value mode, then sort.
    pub fn post_processors(&self) -> Vec<PostProcessor> {
        let mut post_processors = Vec::new();
        if self.clean {
            post_processors.push(PostProcessor::PurgeObsoleteKeys);
        }
        if self.key_as_default_value {
            post_processors.push(PostProcessor::KeyAsDefaultValue);
        } else if self.null_as_default_value {
            post_processors.push(PostProcessor::NullAsDefaultValue);
        }
        if self.sort {
            post_processors.push(PostProcessor::SortByKey);
        }
        post_processors
    }

    pub fn into_task(self) -> ExtractTask {
        let post_processors = self.post_processors();
        let parsers = ParserKind::all(self.pipe_name.as_deref(), self.marker_name.as_deref());
        let compiler = Compiler::new(self.format, &self.indentation);
        let options = ExtractTaskOptions {
            replace: self.replace,
            patterns: self.patterns,
            extract: ExtractOptions {
                service_name: self.service_name,
                method_name: self.method_name,
            },
        };

        ExtractTask::new(self.inputs, self.outputs, options)
            .set_parsers(parsers)
            .set_post_processors(post_processors)
            .set_compiler(compiler)
    }
}

pub fn run(args: Arguments) -> Result<TaskSummary> {
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    run_in(args, &cwd)
}

/// Load config starting at `cwd`, resolve settings and execute the task.
pub fn run_in(args: Arguments, cwd: &Path) -> Result<TaskSummary> {
    let verbose = args.verbose;
    let config_result = load_config(cwd)?;

    if verbose && config_result.path.is_none() {
        eprintln!("Note: No {} found, using command-line options", CONFIG_FILE_NAME);
    }

    let config_dir = config_result
        .path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(cwd)
        .to_path_buf();

    let settings = Settings::resolve(args, config_result.config, &config_dir);
    settings.validate()?;
    settings.into_task().execute()
}
