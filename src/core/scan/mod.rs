//! Tree scanner.
//!
//! Walks a parsed module once and reports every text-bearing node the
//! [`Classifier`] accepts:
//!
//! - string literals
//! - static segments of template literals
//! - JSX text
//! - JSX attribute string values
//!
//! Each node is interned in a [`NodeArena`] so that matches carry a stable
//! [`NodeId`] handle instead of a value; the rewriter resolves handles back
//! to source ranges.

mod arena;
mod visitor;

pub use arena::{ByteRange, NodeArena, NodeId, TextNode};

use serde::{Deserialize, Serialize};
use swc_ecma_visit::VisitWith;

use crate::core::classifier::Classifier;
use crate::core::parsers::jsx::ParsedSource;
use visitor::TextVisitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
    Backtick,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
            QuoteStyle::Backtick => '`',
        }
    }
}

/// Position of a matched segment inside its template literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSegment {
    /// Handle of the enclosing template literal.
    pub template: NodeId,
    pub index: usize,
    pub quasi_count: usize,
    pub expr_count: usize,
}

impl TemplateSegment {
    /// True if the template is a single static segment with no expressions.
    pub fn is_whole_template(&self) -> bool {
        self.quasi_count == 1 && self.expr_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    StringLiteral { in_markup_container: bool },
    TemplateSegment(TemplateSegment),
    MarkupText,
    MarkupAttribute { name: String },
}

impl MatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::StringLiteral { .. } => "string",
            MatchKind::TemplateSegment(_) => "template",
            MatchKind::MarkupText => "jsx-text",
            MatchKind::MarkupAttribute { .. } => "jsx-attribute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub node: NodeId,
    pub kind: MatchKind,
    /// Decoded text. Trimmed for JSX text.
    pub value: String,
    /// Quote of the original literal; `None` for JSX text.
    pub quote: Option<QuoteStyle>,
    pub line: usize,
}

/// Result of scanning one file.
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub arena: NodeArena,
    /// Matches in source order.
    pub matches: Vec<TextMatch>,
}

impl ScanOutput {
    pub fn range(&self, m: &TextMatch) -> Option<ByteRange> {
        self.arena.get(m.node).map(|node| node.range)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Scan a parsed module for target-script text.
pub fn scan(parsed: &ParsedSource, classifier: &Classifier) -> ScanOutput {
    let mut visitor = TextVisitor::new(parsed, classifier);
    parsed.module.visit_with(&mut visitor);

    let TextVisitor { arena, matches, .. } = visitor;
    let mut output = ScanOutput { arena, matches };

    let arena = &output.arena;
    output
        .matches
        .sort_by_key(|m| arena.get(m.node).map(|n| n.range.start).unwrap_or(usize::MAX));
    output
}
