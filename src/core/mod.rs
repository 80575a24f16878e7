//! Extraction engine.
//!
//! Leaf first: [`classifier`] decides which text is target-script,
//! [`scan`] finds it in a parsed module, [`key_store`] assigns keys,
//! [`rewrite`] replaces it with lookup calls, and [`process`] runs the
//! whole pipeline over a project.

pub mod classifier;
pub mod file_scanner;
pub mod imports;
pub mod key_store;
pub mod parsers;
pub mod process;
pub mod rewrite;
pub mod scan;

pub use classifier::{Classifier, MatchMode};
pub use key_store::KeyStore;
pub use process::{Process, ProcessOptions, ProcessResult};
