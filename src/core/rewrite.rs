//! Tree rewriter.
//!
//! Turns scanner matches plus their keys into span edits against the original
//! source text and splices them in. Code outside the edited ranges is kept
//! byte for byte.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::scan::{ByteRange, MatchKind, QuoteStyle, ScanOutput, TextMatch};

#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Name of the lookup function, e.g. `$t`.
    pub function_name: String,
    /// Quote used where the original literal has none to reuse.
    pub quote: QuoteStyle,
    /// When false only `extracted` is filled and the code is left untouched.
    pub replace: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            function_name: "$t".to_string(),
            quote: QuoteStyle::Single,
            replace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub key: String,
}

#[derive(Debug, Default)]
pub struct RewriteOutcome {
    pub code: String,
    /// True if at least one replacement was applied.
    pub replaced: bool,
    pub extracted: Vec<ExtractedText>,
    /// Matches that could not be replaced.
    pub failures: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("no key assigned")]
    MissingKey,
    #[error("unknown node handle")]
    UnknownNode,
    #[error("source at {start}..{end} no longer matches the scanned text")]
    StaleRange { start: usize, end: usize },
    #[error("overlaps another replacement at {start}..{end}")]
    Overlap { start: usize, end: usize },
}

struct Edit {
    range: ByteRange,
    replacement: String,
}

/// Rewrite `code` so every match becomes a call to the lookup function.
///
/// `keys[i]` is the key for `scan.matches[i]`. Failures are per match: they
/// are logged and skipped without affecting the other matches.
pub fn rewrite(
    code: &str,
    scan: &ScanOutput,
    keys: &[String],
    options: &RewriteOptions,
) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();
    let mut edits = Vec::new();

    for (index, m) in scan.matches.iter().enumerate() {
        let Some(key) = keys.get(index) else {
            warn!(line = m.line, text = %m.value, "skipping match: {}", RewriteError::MissingKey);
            outcome.failures += 1;
            continue;
        };

        outcome.extracted.push(ExtractedText {
            text: m.value.clone(),
            key: key.clone(),
        });

        if !options.replace {
            continue;
        }

        match build_edit(code, scan, m, key, options) {
            Ok(edit) => edits.push(edit),
            Err(e) => {
                warn!(line = m.line, text = %m.value, "skipping match: {}", e);
                outcome.failures += 1;
            }
        }
    }

    // Apply from the end so earlier offsets stay valid.
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut result = code.to_string();
    let mut applied: Option<ByteRange> = None;
    for edit in edits {
        if let Some(prev) = applied
            && edit.range.end > prev.start
        {
            let e = RewriteError::Overlap {
                start: edit.range.start,
                end: edit.range.end,
            };
            warn!("skipping replacement: {}", e);
            outcome.failures += 1;
            continue;
        }
        result.replace_range(edit.range.start..edit.range.end, &edit.replacement);
        applied = Some(edit.range);
        outcome.replaced = true;
    }

    debug!(
        extracted = outcome.extracted.len(),
        failures = outcome.failures,
        "rewrite finished"
    );
    outcome.code = result;
    outcome
}

fn build_edit(
    code: &str,
    scan: &ScanOutput,
    m: &TextMatch,
    key: &str,
    options: &RewriteOptions,
) -> Result<Edit, RewriteError> {
    let node = scan.arena.get(m.node).ok_or(RewriteError::UnknownNode)?;
    let range = node.range;
    let source = checked_slice(code, range)?;
    if let Some(raw) = &node.raw
        && raw != source
    {
        return Err(RewriteError::StaleRange {
            start: range.start,
            end: range.end,
        });
    }

    let edit = match &m.kind {
        MatchKind::StringLiteral { .. } => {
            // A literal is already in expression position, inside a JSX
            // container or not, so the bare call is enough.
            let quote = match m.quote {
                Some(QuoteStyle::Backtick) | None => options.quote,
                Some(q) => q,
            };
            Edit {
                range,
                replacement: call(&options.function_name, key, quote),
            }
        }
        MatchKind::TemplateSegment(segment) if segment.is_whole_template() => {
            let template = scan
                .arena
                .get(segment.template)
                .ok_or(RewriteError::UnknownNode)?;
            checked_slice(code, template.range)?;
            Edit {
                range: template.range,
                replacement: call(&options.function_name, key, options.quote),
            }
        }
        MatchKind::TemplateSegment(_) => Edit {
            range,
            replacement: format!("${{{}}}", call(&options.function_name, key, options.quote)),
        },
        MatchKind::MarkupText => {
            // Keep surrounding whitespace and newlines where they are.
            let leading = source.len() - source.trim_start().len();
            let trailing = source.len() - source.trim_end().len();
            if leading + trailing >= source.len() {
                return Err(RewriteError::StaleRange {
                    start: range.start,
                    end: range.end,
                });
            }
            Edit {
                range: ByteRange::new(range.start + leading, range.end - trailing),
                replacement: format!("{{{}}}", call(&options.function_name, key, options.quote)),
            }
        }
        MatchKind::MarkupAttribute { .. } => {
            let quote = match m.quote {
                Some(QuoteStyle::Backtick) | None => options.quote,
                Some(q) => q,
            };
            Edit {
                range,
                replacement: format!("{{{}}}", call(&options.function_name, key, quote)),
            }
        }
    };

    Ok(edit)
}

fn checked_slice(code: &str, range: ByteRange) -> Result<&str, RewriteError> {
    code.get(range.start..range.end)
        .ok_or(RewriteError::StaleRange {
            start: range.start,
            end: range.end,
        })
}

/// Render `function_name(<q>key<q>)`.
pub fn call(function_name: &str, key: &str, quote: QuoteStyle) -> String {
    let q = quote.as_char();
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if c == q || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{}({}{}{})", function_name, q, escaped, q)
}
