//! Input file resolution.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};

pub const DEFAULT_PATTERNS: &[&str] = &["/**/*.html", "/**/*.ts"];

/// Result of resolving input files.
#[derive(Debug, Default)]
pub struct ResolvedFiles {
    /// Files in resolution order: input roots first, then patterns, then glob order.
    pub files: Vec<PathBuf>,
    /// Entries the glob walker could not read.
    pub skipped_count: usize,
    /// `root + pattern` combinations that matched nothing.
    pub unmatched: Vec<String>,
}

/// Expand every pattern against every input root.
///
/// Patterns are relative to the root; a leading `/` is ignored. Only regular
/// files are returned, each at most once.
pub fn resolve_files(inputs: &[PathBuf], patterns: &[String]) -> Result<ResolvedFiles> {
    let mut resolved = ResolvedFiles::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for input in inputs {
        let root = Pattern::escape(&input.to_string_lossy());
        for pattern in patterns {
            let full_pattern = Path::new(&root).join(pattern.trim_start_matches('/'));
            let pattern_str = full_pattern.to_string_lossy();
            let entries = glob(&pattern_str)
                .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;

            let mut matched = false;
            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(_) => {
                        resolved.skipped_count += 1;
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                matched = true;
                if seen.insert(path.clone()) {
                    resolved.files.push(path);
                }
            }

            if !matched {
                resolved.unmatched.push(pattern_str.to_string());
            }
        }
    }

    Ok(resolved)
}

pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}
