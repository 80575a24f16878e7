//! Target-script text classification.
//!
//! Decides whether a piece of text carries Chinese text worth extracting.
//! Two policies are supported:
//!
//! - [`MatchMode::Any`]: at least one target character anywhere in the text
//! - [`MatchMode::All`]: every non-whitespace character is a target character
//!
//! Exclusion rules (comment-looking text, custom regex patterns) run first and
//! short-circuit classification.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classification policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every non-whitespace character must be a target-script character.
    All,
    /// At least one target-script character must be present.
    #[default]
    Any,
}

/// Returns true for CJK ideographs and CJK / full-width punctuation.
pub fn is_target_char(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fa5}'
        | '\u{9fa6}'..='\u{9fef}'
        | '\u{fa0c}'..='\u{fa29}'
        | '\u{3000}'..='\u{303f}'
        | '\u{ff01}'..='\u{ff0f}'
        | '\u{ff1a}'..='\u{ff20}'
        | '\u{ff3b}'..='\u{ff40}'
        | '\u{ff5b}'..='\u{ff65}'
        | '\u{2000}'..='\u{206f}'
    )
}

#[derive(Debug, Clone)]
pub struct Classifier {
    mode: MatchMode,
    exclude_comments: bool,
    exclude_patterns: Vec<Regex>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            mode: MatchMode::Any,
            exclude_comments: true,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Classifier {
    pub fn new(mode: MatchMode, exclude_comments: bool, patterns: &[String]) -> Result<Self> {
        let exclude_patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).with_context(|| format!("Invalid exclude pattern: \"{}\"", p))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mode,
            exclude_comments,
            exclude_patterns,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Classify with the configured policy.
    pub fn is_match(&self, text: &str) -> bool {
        self.classify(text, self.mode)
    }

    /// Classify with an explicit policy. Total over all inputs.
    pub fn classify(&self, text: &str, mode: MatchMode) -> bool {
        if text.trim().is_empty() || self.is_excluded(text) {
            return false;
        }

        match mode {
            MatchMode::All => text.chars().all(|c| c.is_whitespace() || is_target_char(c)),
            MatchMode::Any => text.chars().any(is_target_char),
        }
    }

    /// Split `text` into the parts that should be extracted.
    ///
    /// `All` yields every maximal run of target characters; `Any` yields the
    /// whole text when it contains a target character.
    pub fn extract_segments(&self, text: &str, mode: MatchMode) -> Vec<String> {
        if text.is_empty() || self.is_excluded(text) {
            return Vec::new();
        }

        match mode {
            MatchMode::All => {
                let mut segments = Vec::new();
                let mut current = String::new();
                for c in text.chars() {
                    if is_target_char(c) {
                        current.push(c);
                    } else if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                if !current.is_empty() {
                    segments.push(current);
                }
                segments
            }
            MatchMode::Any => {
                if text.chars().any(is_target_char) {
                    vec![text.to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn is_excluded(&self, text: &str) -> bool {
        if self.exclude_comments && looks_like_comment(text) {
            return true;
        }
        self.exclude_patterns.iter().any(|re| re.is_match(text))
    }
}

fn looks_like_comment(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with("//") || (trimmed.starts_with("/*") && trimmed.ends_with("*/"))
}
