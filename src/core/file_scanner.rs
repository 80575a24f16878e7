use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Check if a pattern contains glob syntax.
/// Patterns without it are treated as literal files or directories.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Compile one pattern the way include and exclude lists use it.
///
/// `*` stays within a path component and `{a,b}` alternation is supported.
pub fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Include/exclude matcher over paths relative to the project root.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    include_set: GlobSet,
    exclude_set: GlobSet,
    match_all: bool,
}

impl FileMatcher {
    /// An empty `includes` list matches every file under the root.
    ///
    /// A literal include such as `pages` or `src/app.ts` matches that path
    /// and everything below it.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in includes {
            let make_error = |source| MatcherError::InvalidIncludePattern {
                pattern: pattern.clone(),
                source,
            };
            let trimmed = pattern.trim_end_matches('/');
            builder.add(compile_glob(trimmed).map_err(make_error)?);
            if !is_glob_pattern(trimmed) {
                builder.add(compile_glob(&format!("{}/**", trimmed)).map_err(make_error)?);
            }
        }
        let include_set = builder.build()?;

        let mut builder = GlobSetBuilder::new();
        for pattern in excludes {
            let glob = compile_glob(pattern).map_err(|source| MatcherError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let exclude_set = builder.build()?;

        Ok(Self {
            include_set,
            exclude_set,
            match_all: includes.is_empty(),
        })
    }

    /// Returns true if the relative path is included and not excluded.
    pub fn is_source_file_relative(&self, relative_path: &Path) -> bool {
        (self.match_all || self.include_set.is_match(relative_path))
            && !self.exclude_set.is_match(relative_path)
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.exclude_set.is_match(relative_path)
    }
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted and deduplicated.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Collect source files under `base_dir`.
///
/// `includes` are globs or literal files/directories relative to
/// `base_dir`. `excludes` are globs matched against the same relative path;
/// an excluded directory is not descended into.
pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<ScanResult, MatcherError> {
    let matcher = FileMatcher::new(includes, excludes)?;
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let walker = WalkDir::new(base_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let relative = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
            !matcher.is_excluded(relative)
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                debug!("Cannot access path: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_scannable_file(path) {
            continue;
        }
        let relative = path.strip_prefix(base_dir).unwrap_or(path);
        if matcher.is_source_file_relative(relative) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(ScanResult {
        files,
        skipped_count,
    })
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js")
    )
}
