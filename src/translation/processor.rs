use serde::Serialize;
use tracing::{debug, info};

use super::provider::TranslateOptions;
use super::queue::TranslationQueue;
use crate::config::Config;
use crate::core::key_store::KeyStore;
use crate::core::parsers::json::LocaleTable;

/// Maps locale codes (`zh-CN`) to provider language codes (`zh`).
#[derive(Debug, Clone)]
pub struct LanguageMap {
    primary_locale: String,
    fallback_locale: String,
    source_lang: String,
    target_lang: String,
}

impl LanguageMap {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary_locale: config.locale.clone(),
            fallback_locale: config.fallback_locale.clone(),
            source_lang: config.translation.default_source_lang.clone(),
            target_lang: config.translation.default_target_lang.clone(),
        }
    }

    /// The configured pair wins for the primary and fallback locales;
    /// anything else uses its language subtag.
    pub fn code_for(&self, locale: &str) -> String {
        if locale == self.primary_locale && !self.source_lang.is_empty() {
            return self.source_lang.clone();
        }
        if locale == self.fallback_locale && !self.target_lang.is_empty() {
            return self.target_lang.clone();
        }
        locale
            .split(['-', '_'])
            .next()
            .unwrap_or(locale)
            .to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationFailure {
    pub text: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSummary {
    pub locale: String,
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub failures: Vec<TranslationFailure>,
}

impl TranslationSummary {
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }
}

/// Fill the keys of `source_locale` that `target_locale` lacks.
///
/// Successful translations are merged into the target table; existing
/// target entries are never overwritten.
pub async fn translate_store(
    queue: &TranslationQueue,
    store: &mut KeyStore,
    source_locale: &str,
    target_locale: &str,
    options: &TranslateOptions,
) -> TranslationSummary {
    let missing: Vec<(String, String)> = store
        .get_all(Some(source_locale))
        .into_iter()
        .filter(|(key, value)| !value.is_empty() && !store.has_key(key, Some(target_locale)))
        .collect();

    let mut summary = TranslationSummary {
        locale: target_locale.to_string(),
        total: missing.len(),
        ..Default::default()
    };
    if missing.is_empty() {
        debug!(locale = target_locale, "nothing to translate");
        return summary;
    }

    info!(
        from = source_locale,
        to = target_locale,
        count = missing.len(),
        "translating missing keys"
    );

    let texts: Vec<String> = missing.iter().map(|(_, value)| value.clone()).collect();
    let results = queue.add_batch_tasks(&texts, options).await;

    let mut translated = LocaleTable::new();
    for ((key, text), result) in missing.into_iter().zip(results) {
        match result {
            Ok(r) => {
                translated.insert(key, r.target);
                summary.success_count += 1;
            }
            Err(e) => {
                summary.failed_count += 1;
                summary.failures.push(TranslationFailure {
                    text,
                    error: e.to_string(),
                });
            }
        }
    }
    store.merge(&translated, Some(target_locale));

    summary
}
