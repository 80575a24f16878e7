use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed source file together with the text it was parsed from.
///
/// Spans in `module` are absolute positions in `source_map`; use
/// [`ParsedSource::offset`] to turn them into byte offsets into `code`.
pub struct ParsedSource {
    pub module: Module,
    pub code: String,
    pub source_map: Arc<SourceMap>,
    start_pos: BytePos,
}

impl ParsedSource {
    /// Byte offset of `pos` within `code`.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// 1-based line number of `pos`.
    pub fn line(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }
}

/// Parse JS/JSX/TS/TSX source code into an AST.
///
/// Everything is parsed as TSX, which accepts plain JS and JSX as well.
pub fn parse_source(code: &str, file_path: &str) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map
            .new_source_file(FileName::Real(file_path.into()).into(), code.to_string());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedSource {
            module,
            code: code.to_string(),
            start_pos: source_file.start_pos,
            source_map: source_map.clone(),
        })
    })
}
