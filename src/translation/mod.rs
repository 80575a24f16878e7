//! Machine translation of locale tables.
//!
//! Providers implement [`TranslationProvider`] and are created by name from
//! a [`ProviderRegistry`]. All requests go through a [`TranslationQueue`],
//! which bounds concurrency and retries failures.

pub mod baidu;
pub mod processor;
pub mod provider;
pub mod queue;

pub use processor::{LanguageMap, TranslationFailure, TranslationSummary, translate_store};
pub use provider::{
    ProviderRegistry, TranslateOptions, TranslationError, TranslationProvider, TranslationResult,
};
pub use queue::{QueueOptions, TaskState, TranslationQueue};
