//! File parsers for source code and locale files.
//!
//! - `json`: locale table reading and writing
//! - `jsx`: JS/JSX/TS/TSX source parser (uses swc for AST generation)

pub mod json;
pub mod jsx;
