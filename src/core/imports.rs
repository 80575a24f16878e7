//! Auto-import of the lookup function into rewritten files.

use anyhow::Result;
use swc_ecma_ast::{Decl, ImportSpecifier, ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt};
use tracing::debug;

use crate::config::{AutoImportConfig, InsertPosition};
use crate::core::parsers::jsx::{ParsedSource, parse_source};

/// Insert the configured import for `function_name` into `code`.
///
/// Returns `None` when nothing needs to change: no import is configured for
/// the name, the statement is already present, or the module already binds
/// the name at top level.
pub fn insert_import(
    code: &str,
    file_path: &str,
    function_name: &str,
    config: &AutoImportConfig,
) -> Result<Option<String>> {
    let Some(spec) = config.imports.get(function_name) else {
        debug!(function = function_name, "no import configured");
        return Ok(None);
    };
    let statement = spec.import_statement.trim();
    if statement.is_empty() || code.contains(statement) {
        return Ok(None);
    }

    let parsed = parse_source(code, file_path)?;
    if binds_name(&parsed, function_name) {
        debug!(file = file_path, function = function_name, "already bound, skipping import");
        return Ok(None);
    }

    let offset = insert_offset(&parsed, config.insert_position);
    let mut output = String::with_capacity(code.len() + statement.len() + 1);
    output.push_str(&code[..offset]);
    if offset > 0 && !code[..offset].ends_with('\n') {
        output.push('\n');
        output.push_str(statement);
    } else {
        output.push_str(statement);
        output.push('\n');
    }
    output.push_str(&code[offset..]);
    Ok(Some(output))
}

fn import_ranges(parsed: &ParsedSource) -> Vec<(usize, usize)> {
    parsed
        .module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                Some((parsed.offset(import.span.lo), parsed.offset(import.span.hi)))
            }
            _ => None,
        })
        .collect()
}

fn insert_offset(parsed: &ParsedSource, position: InsertPosition) -> usize {
    let imports = import_ranges(parsed);
    let top = top_of_file(&parsed.code);
    match position {
        InsertPosition::AfterImports => imports.last().map_or(top, |&(_, end)| end),
        InsertPosition::BeforeImports => imports.first().map_or(top, |&(start, _)| start),
        InsertPosition::TopOfFile => top,
    }
}

/// Start of the file, after a shebang line if there is one.
fn top_of_file(code: &str) -> usize {
    if code.starts_with("#!") {
        code.find('\n').map_or(code.len(), |i| i + 1)
    } else {
        0
    }
}

fn binds_name(parsed: &ParsedSource, name: &str) -> bool {
    parsed.module.body.iter().any(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
            import.specifiers.iter().any(|spec| {
                let local = match spec {
                    ImportSpecifier::Named(s) => &s.local,
                    ImportSpecifier::Default(s) => &s.local,
                    ImportSpecifier::Namespace(s) => &s.local,
                };
                local.sym.as_str() == name
            })
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_binds(&export.decl, name),
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl_binds(decl, name),
        _ => false,
    })
}

fn decl_binds(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Var(var) => var.decls.iter().any(|d| pat_binds(&d.name, name)),
        Decl::Fn(f) => f.ident.sym.as_str() == name,
        _ => false,
    }
}

fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(ident) => ident.id.sym.as_str() == name,
        Pat::Object(obj) => obj.props.iter().any(|prop| match prop {
            ObjectPatProp::Assign(assign) => assign.key.sym.as_str() == name,
            ObjectPatProp::KeyValue(kv) => pat_binds(&kv.value, name),
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        Pat::Array(arr) => arr.elems.iter().flatten().any(|p| pat_binds(p, name)),
        _ => false,
    }
}
