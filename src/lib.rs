//! i18n-xy - extract embedded Chinese text from JS/TS/JSX/TSX sources
//!
//! i18n-xy finds target-script text in string literals, template literals,
//! JSX text and JSX attributes, assigns each distinct text a short key,
//! rewrites the source to call a lookup function (`$t('key')`), and keeps
//! per-locale JSON files. Missing locales can be back-filled through a
//! machine translation provider.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and validation
//! - `core`: Scanner, key store, rewriter and the processing pipeline
//! - `logging`: Diagnostic output through `tracing`
//! - `translation`: Providers and the bounded translation queue

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod translation;
