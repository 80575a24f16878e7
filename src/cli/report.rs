//! Report formatting and printing utilities.
//!
//! Separate from core logic so the pipeline can be used as a library.

use std::{
    collections::BTreeSet,
    env,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, InitSummary, ProcessSummary, TranslateSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::translation::TranslationSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of failed translations listed per locale.
const MAX_FAILURES_DISPLAY: usize = 10;

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Init(summary) => print_init_to(summary, writer),
        CommandSummary::Process(summary) => print_process_to(summary, verbose, writer),
        CommandSummary::Translate(summary) => print_translate_to(summary, writer),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Path relative to the working directory when possible.
fn display_path(path: &Path) -> String {
    let relative = env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    relative
        .as_deref()
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    let name = summary
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());

    if summary.created {
        let verb = if summary.overwritten {
            "Overwrote"
        } else {
            "Created"
        };
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{} {}", verb, name).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists (use {} to overwrite)",
            FAILURE_MARK.red(),
            name,
            "--force".cyan()
        );
    }
}

fn print_process_to<W: Write>(summary: &ProcessSummary, verbose: bool, writer: &mut W) {
    let result = &summary.result;

    for error in &result.errors {
        let _ = writeln!(writer, "{}: {}", "error".bold().red(), error.error);
        let _ = writeln!(writer, "  {} {}", "-->".blue(), display_path(&error.file));
    }
    if !result.errors.is_empty() {
        let _ = writeln!(writer);
    }

    if verbose && !result.extracted.is_empty() {
        let unique: BTreeSet<(&str, &str)> = result
            .extracted
            .iter()
            .map(|e| (e.key.as_str(), e.text.as_str()))
            .collect();
        for (key, text) in unique {
            let _ = writeln!(writer, "  {} {:?}", key.cyan(), text);
        }
    }

    if summary.replace && !result.replaced_files.is_empty() {
        let count = result.replaced_files.len();
        let verb = if summary.dry_run {
            "Would replace".yellow().bold()
        } else {
            "Replaced".green().bold()
        };
        let _ = writeln!(
            writer,
            "{} text in {} {}:",
            verb,
            count,
            plural(count, "file", "files")
        );
        for file in &result.replaced_files {
            let _ = writeln!(writer, "  - {}", display_path(file));
        }
    }

    if !result.locale_files.is_empty() {
        let count = result.locale_files.len();
        let _ = writeln!(
            writer,
            "{} {} locale {}:",
            "Wrote".green().bold(),
            count,
            plural(count, "file", "files")
        );
        for file in &result.locale_files {
            let _ = writeln!(writer, "  - {}", display_path(file));
        }
    }

    let headline = format!(
        "Scanned {} {}, extracted {} {}",
        result.scanned_files,
        plural(result.scanned_files, "file", "files"),
        result.extracted_texts,
        plural(result.extracted_texts, "text", "texts")
    );
    if result.has_failures() {
        let _ = writeln!(
            writer,
            "{} {}, {} {} failed",
            FAILURE_MARK.red(),
            headline,
            result.failed_files,
            plural(result.failed_files, "file", "files")
        );
    } else {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());
    }

    if summary.dry_run {
        let _ = writeln!(
            writer,
            "Dry run: no files were written. Run without {} to apply.",
            "--dry-run".cyan()
        );
    }
}

fn print_translate_to<W: Write>(summary: &TranslateSummary, writer: &mut W) {
    for locale in &summary.summaries {
        print_locale_to(locale, writer);
    }
}

fn print_locale_to<W: Write>(summary: &TranslationSummary, writer: &mut W) {
    if summary.total == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{}: up to date", summary.locale).green()
        );
        return;
    }

    let line = format!(
        "{}: translated {} of {} {}",
        summary.locale,
        summary.success_count,
        summary.total,
        plural(summary.total, "key", "keys")
    );
    if !summary.has_failures() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), line.green());
        return;
    }

    let _ = writeln!(
        writer,
        "{} {}, {} failed",
        FAILURE_MARK.red(),
        line,
        summary.failed_count
    );
    for failure in summary.failures.iter().take(MAX_FAILURES_DISPLAY) {
        let _ = writeln!(writer, "  - {:?}: {}", failure.text, failure.error.dimmed());
    }
    let remaining = summary.failures.len().saturating_sub(MAX_FAILURES_DISPLAY);
    if remaining > 0 {
        let _ = writeln!(writer, "  ... and {} more", remaining);
    }
}
