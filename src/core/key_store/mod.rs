//! Key store.
//!
//! Owns the `locale -> key -> text` tables. The primary locale (the locale
//! the source text is written in) also keeps a reverse `text -> key` index
//! so repeated texts reuse one key.
//!
//! The store is mutated through `&mut self` only; callers that process
//! several files at once must route every `add` through one owner.

mod generator;

pub use generator::{CollisionStrategy, KeyGenerationPolicy, romanize, short_hash};

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::parsers::json::{LocaleTable, read_locale_file, write_locale_file};

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key store persistence is not configured (no output directory)")]
    NotInitialized,
}

/// Where and how locale tables are stored on disk.
#[derive(Debug, Clone)]
pub struct LocaleFiles {
    pub output_dir: PathBuf,
    /// File name template containing `{locale}`.
    pub file_name: String,
    pub pretty: bool,
}

impl LocaleFiles {
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.output_dir
            .join(self.file_name.replace("{locale}", locale))
    }
}

#[derive(Debug)]
pub struct KeyStore {
    policy: KeyGenerationPolicy,
    primary_locale: String,
    fallback_locale: Option<String>,
    tables: BTreeMap<String, LocaleTable>,
    reverse: HashMap<String, String>,
    files: Option<LocaleFiles>,
}

impl KeyStore {
    pub fn new(primary_locale: impl Into<String>, policy: KeyGenerationPolicy) -> Self {
        Self {
            policy,
            primary_locale: primary_locale.into(),
            fallback_locale: None,
            tables: BTreeMap::new(),
            reverse: HashMap::new(),
            files: None,
        }
    }

    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    pub fn with_files(mut self, files: LocaleFiles) -> Self {
        self.files = Some(files);
        self
    }

    pub fn primary_locale(&self) -> &str {
        &self.primary_locale
    }

    pub fn policy(&self) -> &KeyGenerationPolicy {
        &self.policy
    }

    pub fn files(&self) -> Option<&LocaleFiles> {
        self.files.as_ref()
    }

    fn locale_or_primary<'a>(&'a self, locale: Option<&'a str>) -> &'a str {
        locale.unwrap_or(&self.primary_locale)
    }

    /// Add `value` to the primary locale and return its key.
    pub fn add(&mut self, value: &str) -> String {
        self.add_to(value, None, None)
    }

    /// Add `value` with an optional explicit key to an optional locale.
    ///
    /// An explicit key is used verbatim. Otherwise an existing key for the
    /// same text is reused (when enabled), or a new one is synthesized.
    pub fn add_to(&mut self, value: &str, key: Option<&str>, locale: Option<&str>) -> String {
        let locale = self.locale_or_primary(locale).to_string();

        let key = match key {
            Some(k) => k.to_string(),
            None => match self.reverse.get(value) {
                Some(existing) if self.policy.reuse_existing_key => {
                    debug!(key = %existing, "reusing existing key");
                    existing.clone()
                }
                _ => self.generate_key(value, &locale),
            },
        };

        self.tables
            .entry(locale.clone())
            .or_default()
            .insert(key.clone(), value.to_string());
        if locale == self.primary_locale {
            self.reverse.insert(value.to_string(), key.clone());
        }
        key
    }

    /// Add `(value, key)` pairs; empty values are skipped. Returns how many were added.
    pub fn add_batch<'a, I>(&mut self, entries: I, locale: Option<&str>) -> usize
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut count = 0;
        for (value, key) in entries {
            if value.is_empty() {
                continue;
            }
            self.add_to(value, key, locale);
            count += 1;
        }
        count
    }

    /// Synthesize a key for `value` that does not clash with a different
    /// text in `locale`.
    pub fn generate_key(&self, value: &str, locale: &str) -> String {
        let base = self.policy.base_key(value);
        let clashes = |candidate: &str| {
            self.tables
                .get(locale)
                .and_then(|table| table.get(candidate))
                .is_some_and(|existing| existing != value)
        };

        let mut key = base.clone();
        let mut retries = 0;
        while clashes(&key) && retries < self.policy.max_retry_count {
            key = self.policy.collision_key(&base, value, retries);
            retries += 1;
        }

        if clashes(&key) {
            let fallback = format!(
                "{}{}{}",
                base,
                self.policy.separator,
                Utc::now().timestamp_millis()
            );
            warn!(
                base = %base,
                key = %fallback,
                "collision retries exhausted, using timestamp suffix"
            );
            key = fallback;
        }

        key
    }

    /// Key of `value` in the primary locale.
    pub fn get_key_by_value(&self, value: &str) -> Option<&str> {
        self.reverse.get(value).map(String::as_str)
    }

    pub fn get_value_by_key(&self, key: &str, locale: Option<&str>) -> Option<&str> {
        self.tables
            .get(self.locale_or_primary(locale))
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    pub fn has_key(&self, key: &str, locale: Option<&str>) -> bool {
        self.get_value_by_key(key, locale).is_some()
    }

    pub fn has_value(&self, value: &str, locale: Option<&str>) -> bool {
        let locale = self.locale_or_primary(locale);
        if locale == self.primary_locale {
            return self.reverse.contains_key(value);
        }
        self.tables
            .get(locale)
            .is_some_and(|table| table.values().any(|v| v == value))
    }

    /// Remove `key` from one locale, or from all locales when `locale` is `None`.
    pub fn remove(&mut self, key: &str, locale: Option<&str>) -> bool {
        let targets: Vec<String> = match locale {
            Some(l) => vec![l.to_string()],
            None => self.tables.keys().cloned().collect(),
        };

        let mut removed = false;
        for target in targets {
            let Some(table) = self.tables.get_mut(&target) else {
                continue;
            };
            if let Some(value) = table.remove(key) {
                removed = true;
                if target == self.primary_locale
                    && self.reverse.get(&value).is_some_and(|k| k == key)
                {
                    self.reverse.remove(&value);
                }
            }
        }
        removed
    }

    /// Clear one locale, or everything when `locale` is `None`.
    pub fn clear(&mut self, locale: Option<&str>) {
        match locale {
            Some(l) => {
                self.tables.insert(l.to_string(), LocaleTable::new());
                if l == self.primary_locale {
                    self.reverse.clear();
                }
            }
            None => {
                self.tables.clear();
                self.reverse.clear();
            }
        }
    }

    pub fn count(&self, locale: Option<&str>) -> usize {
        self.tables
            .get(self.locale_or_primary(locale))
            .map_or(0, |table| table.len())
    }

    pub fn get_all_keys(&self, locale: Option<&str>) -> Vec<String> {
        self.tables
            .get(self.locale_or_primary(locale))
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_all_values(&self, locale: Option<&str>) -> Vec<String> {
        self.tables
            .get(self.locale_or_primary(locale))
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_all(&self, locale: Option<&str>) -> LocaleTable {
        self.tables
            .get(self.locale_or_primary(locale))
            .cloned()
            .unwrap_or_default()
    }

    pub fn locales(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Merge `data` into a locale. Same-keyed entries are overwritten.
    /// Returns the number of keys that were not present before.
    pub fn merge(&mut self, data: &LocaleTable, locale: Option<&str>) -> usize {
        let locale = self.locale_or_primary(locale).to_string();
        let table = self.tables.entry(locale.clone()).or_default();
        let before = table.len();
        for (key, value) in data {
            table.insert(key.clone(), value.clone());
        }
        let added = table.len() - before;

        if locale == self.primary_locale {
            for (key, value) in data {
                self.reverse.insert(value.clone(), key.clone());
            }
        }
        added
    }

    fn require_files(&self) -> Result<&LocaleFiles> {
        self.files
            .as_ref()
            .ok_or_else(|| KeyStoreError::NotInitialized.into())
    }

    /// Load locale tables from disk.
    ///
    /// Defaults to the primary and fallback locales. A missing file yields an
    /// empty table. Returns true if at least one file was read.
    pub fn load_existing_data(&mut self, locales: Option<&[String]>) -> Result<bool> {
        let files = self.require_files()?.clone();
        let targets: Vec<String> = match locales {
            Some(l) => l.to_vec(),
            None => self.default_locales(),
        };

        let mut loaded_any = false;
        for locale in targets {
            let path = files.path_for(&locale);
            match read_locale_file(&path)? {
                Some(table) => {
                    debug!(locale = %locale, path = %path.display(), entries = table.len(), "loaded locale file");
                    if locale == self.primary_locale {
                        self.reverse.clear();
                        for (key, value) in &table {
                            self.reverse.insert(value.clone(), key.clone());
                        }
                    }
                    self.tables.insert(locale, table);
                    loaded_any = true;
                }
                None => {
                    debug!(locale = %locale, "locale file not found, starting empty");
                    self.tables.entry(locale).or_default();
                }
            }
        }
        Ok(loaded_any)
    }

    /// Write locale tables to disk with sorted keys.
    ///
    /// Defaults to every locale currently held. Returns the written paths.
    pub fn save_to_file(&self, locales: Option<&[String]>) -> Result<Vec<PathBuf>> {
        let files = self.require_files()?;
        let targets: Vec<String> = match locales {
            Some(l) => l.to_vec(),
            None => self.locales(),
        };

        let empty = LocaleTable::new();
        let mut written = Vec::new();
        for locale in targets {
            let table = self.tables.get(&locale).unwrap_or(&empty);
            let path = files.path_for(&locale);
            write_locale_file(&path, table, files.pretty)?;
            debug!(locale = %locale, path = %path.display(), entries = table.len(), "saved locale file");
            written.push(path);
        }
        Ok(written)
    }

    fn default_locales(&self) -> Vec<String> {
        let mut locales = vec![self.primary_locale.clone()];
        if let Some(fallback) = &self.fallback_locale
            && fallback != &self.primary_locale
        {
            locales.push(fallback.clone());
        }
        locales
    }
}
