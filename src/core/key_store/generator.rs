use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};

/// How to disambiguate two texts that synthesize the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionStrategy {
    /// Append a short hash of the text and the attempt number.
    #[default]
    Hash,
    /// Append an incrementing counter.
    Counter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenerationPolicy {
    /// Texts longer than this (in chars) get a hash key instead of pinyin.
    pub max_primary_length: usize,
    pub hash_length: usize,
    pub reuse_existing_key: bool,
    pub collision_strategy: CollisionStrategy,
    pub key_prefix: String,
    pub separator: String,
    pub max_retry_count: usize,
}

impl Default for KeyGenerationPolicy {
    fn default() -> Self {
        Self {
            max_primary_length: 10,
            hash_length: 6,
            reuse_existing_key: true,
            collision_strategy: CollisionStrategy::Hash,
            key_prefix: String::new(),
            separator: "_".to_string(),
            max_retry_count: 5,
        }
    }
}

impl KeyGenerationPolicy {
    fn prefix(&self) -> String {
        if self.key_prefix.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.key_prefix, self.separator)
        }
    }

    /// Synthesize the base key for `value`, before collision handling.
    pub fn base_key(&self, value: &str) -> String {
        if value.chars().count() > self.max_primary_length {
            return self.hash_key(value);
        }

        let romanized = romanize(value);
        if romanized.is_empty() {
            // Punctuation-only text has no romanization.
            return self.hash_key(value);
        }
        format!("{}{}", self.prefix(), romanized)
    }

    pub fn hash_key(&self, value: &str) -> String {
        format!("{}{}", self.prefix(), short_hash(value, self.hash_length))
    }

    /// Candidate key for collision attempt `retries` (0-based).
    pub fn collision_key(&self, base: &str, value: &str, retries: usize) -> String {
        match self.collision_strategy {
            CollisionStrategy::Hash => format!(
                "{}{}{}",
                base,
                self.separator,
                short_hash(&format!("{}{}", value, retries), self.hash_length)
            ),
            CollisionStrategy::Counter => format!("{}{}{}", base, self.separator, retries + 1),
        }
    }
}

/// First `len` hex chars of the md5 digest of `input`.
pub fn short_hash(input: &str, len: usize) -> String {
    let digest = format!("{:x}", md5::compute(input.as_bytes()));
    digest.chars().take(len).collect()
}

/// Toneless pinyin of `text`, lowercased, keeping only ASCII alphanumerics.
///
/// Characters without a pinyin reading pass through before filtering, so
/// `"Hello你好"` becomes `"hellonihao"`.
pub fn romanize(text: &str) -> String {
    let mut out = String::new();
    for (c, reading) in text.chars().zip(text.to_pinyin()) {
        match reading {
            Some(p) => out.push_str(p.plain()),
            None => out.push(c),
        }
    }
    out.retain(|c| c.is_ascii_alphanumeric());
    out.to_ascii_lowercase()
}
