use std::collections::HashSet;

use swc_common::{BytePos, Span};
use swc_ecma_ast::{
    ExportAll, Expr, ImportDecl, JSXAttr, JSXAttrName, JSXAttrValue, JSXExpr, JSXExprContainer,
    JSXText, Lit, NamedExport, PropName, Str, TaggedTpl, Tpl, TsEnumMemberId, TsImportEqualsDecl,
    TsModuleName, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::arena::{ByteRange, NodeArena};
use super::{MatchKind, QuoteStyle, TemplateSegment, TextMatch};
use crate::core::classifier::Classifier;
use crate::core::parsers::jsx::ParsedSource;

/// Single-pass visitor collecting text matches of the four recognized kinds.
pub(super) struct TextVisitor<'a> {
    parsed: &'a ParsedSource,
    classifier: &'a Classifier,
    pub arena: NodeArena,
    pub matches: Vec<TextMatch>,
    /// String literals that are the whole expression of a JSX container.
    container_literals: HashSet<ByteRange>,
}

impl<'a> TextVisitor<'a> {
    pub fn new(parsed: &'a ParsedSource, classifier: &'a Classifier) -> Self {
        Self {
            parsed,
            classifier,
            arena: NodeArena::default(),
            matches: Vec::new(),
            container_literals: HashSet::new(),
        }
    }

    fn range(&self, span: Span) -> ByteRange {
        ByteRange::new(self.parsed.offset(span.lo), self.parsed.offset(span.hi))
    }

    fn quote_at(&self, range: ByteRange) -> QuoteStyle {
        match self.parsed.code.as_bytes().get(range.start) {
            Some(b'"') => QuoteStyle::Double,
            Some(b'`') => QuoteStyle::Backtick,
            _ => QuoteStyle::Single,
        }
    }

    fn record(
        &mut self,
        span: Span,
        raw: Option<String>,
        kind: MatchKind,
        value: &str,
        quote: Option<QuoteStyle>,
        line: usize,
    ) {
        let range = self.range(span);
        let node = self.arena.intern(range, raw);
        if !self.arena.mark_visited(node) {
            return;
        }
        self.matches.push(TextMatch {
            node,
            kind,
            value: value.to_string(),
            quote,
            line,
        });
    }
}

impl Visit for TextVisitor<'_> {
    // Module specifiers and type-level strings are never user-facing text.
    fn visit_import_decl(&mut self, _: &ImportDecl) {}
    fn visit_export_all(&mut self, _: &ExportAll) {}
    fn visit_named_export(&mut self, _: &NamedExport) {}
    fn visit_ts_import_equals_decl(&mut self, _: &TsImportEqualsDecl) {}
    fn visit_ts_type(&mut self, _: &TsType) {}
    fn visit_ts_module_name(&mut self, _: &TsModuleName) {}
    fn visit_ts_enum_member_id(&mut self, _: &TsEnumMemberId) {}

    fn visit_prop_name(&mut self, node: &PropName) {
        // Only computed keys hold expressions.
        if let PropName::Computed(computed) = node {
            computed.visit_with(self);
        }
    }

    fn visit_str(&mut self, node: &Str) {
        let Some(value) = node.value.as_str() else {
            return;
        };
        if !self.classifier.is_match(value) {
            return;
        }

        let range = self.range(node.span);
        let kind = MatchKind::StringLiteral {
            in_markup_container: self.container_literals.contains(&range),
        };
        let quote = self.quote_at(range);
        let raw = node.raw.as_ref().map(|r| r.to_string());
        let line = self.parsed.line(node.span.lo);
        self.record(node.span, raw, kind, value, Some(quote), line);
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        let template_range = self.range(node.span);
        let template = self.arena.intern(template_range, None);

        if self.arena.mark_visited(template) {
            let quasi_count = node.quasis.len();
            let expr_count = node.exprs.len();

            for (index, quasi) in node.quasis.iter().enumerate() {
                let raw: &str = &quasi.raw;
                let value = quasi
                    .cooked
                    .as_ref()
                    .and_then(|cooked| cooked.as_str())
                    .unwrap_or(raw);

                if !self.classifier.is_match(value) {
                    continue;
                }

                let kind = MatchKind::TemplateSegment(TemplateSegment {
                    template,
                    index,
                    quasi_count,
                    expr_count,
                });
                let line = self.parsed.line(quasi.span.lo);
                self.record(
                    quasi.span,
                    Some(raw.to_string()),
                    kind,
                    value,
                    Some(QuoteStyle::Backtick),
                    line,
                );
            }
        }

        for expr in &node.exprs {
            expr.visit_with(self);
        }
    }

    // A tag receives the raw quasis as arguments, so they cannot become calls.
    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        node.tag.visit_with(self);
        for expr in &node.tpl.exprs {
            expr.visit_with(self);
        }
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        let trimmed = node.value.trim();
        if trimmed.is_empty() || !self.classifier.is_match(trimmed) {
            return;
        }

        // Report the line of the text itself, not of the preceding indentation.
        let range = self.range(node.span);
        let leading = self
            .parsed
            .code
            .get(range.start..range.end)
            .map(|text| text.len() - text.trim_start().len())
            .unwrap_or(0);
        let line = self.parsed.line(node.span.lo + BytePos(leading as u32));
        self.record(node.span, None, MatchKind::MarkupText, trimmed, None, line);
    }

    fn visit_jsx_expr_container(&mut self, node: &JSXExprContainer) {
        if let JSXExpr::Expr(expr) = &node.expr
            && let Expr::Lit(Lit::Str(s)) = &**expr
        {
            let range = self.range(s.span);
            self.container_literals.insert(range);
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        let name = match &node.name {
            JSXAttrName::Ident(ident) => ident.sym.to_string(),
            JSXAttrName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
        };

        match &node.value {
            Some(JSXAttrValue::Str(s)) => {
                let Some(value) = s.value.as_str() else {
                    return;
                };
                if !self.classifier.is_match(value) {
                    return;
                }
                let range = self.range(s.span);
                let quote = self.quote_at(range);
                let raw = s.raw.as_ref().map(|r| r.to_string());
                let line = self.parsed.line(s.span.lo);
                self.record(
                    s.span,
                    raw,
                    MatchKind::MarkupAttribute { name },
                    value,
                    Some(quote),
                    line,
                );
            }
            Some(other) => other.visit_with(self),
            None => {}
        }
    }
}
