//! Run summary printing.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::task::TaskSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

/// Print warnings to stderr and the summary to stdout.
pub fn print(summary: &TaskSummary, verbose: bool) {
    print_warnings_to(summary, &mut io::stderr().lock());
    print_summary_to(summary, verbose, &mut io::stdout().lock());
}

pub fn print_warnings_to<W: Write>(summary: &TaskSummary, writer: &mut W) {
    for pattern in &summary.unmatched_patterns {
        let _ = writeln!(
            writer,
            "{} no files found matching {}",
            "warning:".bold().yellow(),
            pattern.cyan()
        );
    }
    if summary.skipped_count > 0 {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read while searching for files",
            "warning:".bold().yellow(),
            summary.skipped_count
        );
    }
}

pub fn print_summary_to<W: Write>(summary: &TaskSummary, verbose: bool, writer: &mut W) {
    if verbose {
        print_files(summary, writer);
    }

    let file_count = summary.files.len();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} {}",
            summary.key_count,
            plural(summary.key_count, "key", "keys"),
            file_count,
            plural(file_count, "file", "files")
        )
        .green()
    );

    for output in &summary.outputs {
        let _ = writeln!(
            writer,
            "  {} {} ({} {})",
            "-->".blue(),
            output.path.display(),
            output.key_count,
            plural(output.key_count, "key", "keys")
        );
    }
}

/// One line per scanned file with its key count, counts aligned.
fn print_files<W: Write>(summary: &TaskSummary, writer: &mut W) {
    let paths: Vec<String> = summary
        .files
        .iter()
        .map(|file| file.path.display().to_string())
        .collect();
    let width = paths.iter().map(|p| p.width()).max().unwrap_or(0);

    for (path, file) in paths.iter().zip(&summary.files) {
        let padding = " ".repeat(width - path.width());
        let count = format!(
            "{} {}",
            file.key_count,
            plural(file.key_count, "key", "keys")
        );
        let count = if file.key_count == 0 {
            count.dimmed()
        } else {
            count.normal()
        };
        let _ = writeln!(writer, "  {}{}  {}", path, padding, count);
    }
    if !summary.files.is_empty() {
        let _ = writeln!(writer);
    }
}
