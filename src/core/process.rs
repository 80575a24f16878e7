//! End-to-end pipeline: discover files, scan, assign keys, rewrite, save.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::classifier::Classifier;
use crate::core::file_scanner::scan_files;
use crate::core::imports::insert_import;
use crate::core::key_store::KeyStore;
use crate::core::parsers::jsx::parse_source;
use crate::core::rewrite::{ExtractedText, RewriteOptions, rewrite};
use crate::core::scan::scan;
use crate::translation::{
    LanguageMap, ProviderRegistry, QueueOptions, TranslateOptions, TranslationQueue,
    TranslationSummary, translate_store,
};

#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Rewrite source files. When false texts are only extracted.
    pub replace: bool,
    /// Insert the configured import into rewritten files, in addition to
    /// `replacement.autoImport.enabled`.
    pub auto_import: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Replaces the configured `include` globs when non-empty.
    pub patterns: Vec<String>,
    /// Added to the configured `exclude` globs.
    pub ignores: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub file: PathBuf,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub scanned_files: usize,
    pub extracted_texts: usize,
    pub replaced_files: Vec<PathBuf>,
    pub success_files: usize,
    pub failed_files: usize,
    pub errors: Vec<FileError>,
    /// Locale files written (empty on dry runs).
    pub locale_files: Vec<PathBuf>,
    /// Texts that got a key, in file order.
    pub extracted: Vec<ExtractedText>,
}

impl ProcessResult {
    pub fn has_failures(&self) -> bool {
        self.failed_files > 0
    }
}

struct FileOutcome {
    extracted: Vec<ExtractedText>,
    replaced: bool,
}

/// Owns the state of one run: config, key store, classifier and the
/// provider registry.
pub struct Process {
    config: Config,
    root: PathBuf,
    store: KeyStore,
    classifier: Classifier,
    registry: ProviderRegistry,
}

impl Process {
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let classifier = config.matcher.classifier()?;
        let store = KeyStore::new(config.locale.clone(), config.key_generation.policy())
            .with_fallback_locale(config.fallback_locale.clone())
            .with_files(config.locale_files(&root));

        Ok(Self {
            config,
            root,
            store,
            classifier,
            registry: ProviderRegistry::with_builtin(),
        })
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Scan every matching file, assign keys and optionally rewrite sources.
    ///
    /// A file that cannot be read, parsed or written is recorded in
    /// `errors` and does not stop the run.
    pub fn execute(&mut self, options: &ProcessOptions) -> Result<ProcessResult> {
        if !options.dry_run {
            self.config.ensure_output_dir(&self.root)?;
        }
        self.store.load_existing_data(None)?;

        let includes = if options.patterns.is_empty() {
            self.config.include.clone()
        } else {
            options.patterns.clone()
        };
        let mut excludes = self.config.exclude.clone();
        excludes.extend(options.ignores.iter().cloned());

        let scanned = scan_files(&self.root, &includes, &excludes)?;
        info!(files = scanned.files.len(), "scanning source files");

        let mut result = ProcessResult {
            scanned_files: scanned.files.len(),
            ..Default::default()
        };

        for file in &scanned.files {
            match self.process_file(file, options) {
                Ok(outcome) => {
                    result.success_files += 1;
                    result.extracted_texts += outcome.extracted.len();
                    result.extracted.extend(outcome.extracted);
                    if outcome.replaced {
                        result.replaced_files.push(file.clone());
                    }
                }
                Err(e) => {
                    warn!(file = %file.display(), "{:#}", e);
                    result.failed_files += 1;
                    result.errors.push(FileError {
                        file: file.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        if result.extracted_texts > 0 && !options.dry_run {
            result.locale_files = self.store.save_to_file(None)?;
        }

        info!(
            scanned = result.scanned_files,
            extracted = result.extracted_texts,
            replaced = result.replaced_files.len(),
            failed = result.failed_files,
            "processing finished"
        );
        Ok(result)
    }

    fn process_file(&mut self, path: &Path, options: &ProcessOptions) -> Result<FileOutcome> {
        let code = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path.to_string_lossy();
        let parsed = parse_source(&code, &file_name)?;

        let scanned = scan(&parsed, &self.classifier);
        if scanned.is_empty() {
            return Ok(FileOutcome {
                extracted: Vec::new(),
                replaced: false,
            });
        }

        let keys: Vec<String> = scanned
            .matches
            .iter()
            .map(|m| self.store.add(&m.value))
            .collect();

        let replacement = &self.config.replacement;
        let rewrite_options = RewriteOptions {
            function_name: replacement.function_name.clone(),
            quote: replacement.quote,
            replace: options.replace,
        };
        let outcome = rewrite(&code, &scanned, &keys, &rewrite_options);
        debug!(
            file = %path.display(),
            texts = outcome.extracted.len(),
            replaced = outcome.replaced,
            "processed file"
        );

        if !outcome.replaced {
            return Ok(FileOutcome {
                extracted: outcome.extracted,
                replaced: false,
            });
        }

        let mut new_code = outcome.code;
        if options.auto_import || replacement.auto_import.enabled {
            if let Some(with_import) = insert_import(
                &new_code,
                &file_name,
                &replacement.function_name,
                &replacement.auto_import,
            )? {
                new_code = with_import;
            }
        }

        if !options.dry_run {
            fs::write(path, new_code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        Ok(FileOutcome {
            extracted: outcome.extracted,
            replaced: true,
        })
    }

    /// Translate the primary locale into each of `locales` and save them.
    ///
    /// `from`/`to` override the provider language codes derived from the
    /// locale names.
    pub async fn translate(
        &mut self,
        locales: &[String],
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TranslationSummary>> {
        let provider = self
            .registry
            .create(&self.config.translation)
            .context("Failed to create translation provider")?;
        let queue = TranslationQueue::new(provider, QueueOptions::from_config(&self.config.translation));

        let primary = self.config.locale.clone();
        let mut targets = vec![primary.clone()];
        targets.extend(locales.iter().filter(|l| **l != primary).cloned());
        self.store.load_existing_data(Some(&targets))?;

        let languages = LanguageMap::from_config(&self.config);
        let source_lang = from.map_or_else(|| languages.code_for(&primary), str::to_string);

        let mut summaries = Vec::new();
        for locale in &targets[1..] {
            let options = TranslateOptions::new(
                source_lang.clone(),
                to.map_or_else(|| languages.code_for(locale), str::to_string),
            );
            let summary = translate_store(&queue, &mut self.store, &primary, locale, &options).await;
            if summary.success_count > 0 {
                self.store.save_to_file(Some(std::slice::from_ref(locale)))?;
            }
            summaries.push(summary);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::config::ImportSpec;
    use crate::core::parsers::json::read_locale_file;
    use crate::translation::{TranslationError, TranslationProvider, TranslationResult};

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    fn replace() -> ProcessOptions {
        ProcessOptions {
            replace: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_only_leaves_sources() {
        let source = "export const a = '你好';\nexport const b = 'hello';\n";
        let dir = project(&[("src/a.ts", source)]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process.execute(&ProcessOptions::default()).unwrap();

        assert_eq!(result.scanned_files, 1);
        assert_eq!(result.extracted_texts, 1);
        assert!(result.replaced_files.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("src/a.ts")).unwrap(),
            source
        );

        let table = read_locale_file(&dir.path().join("locales/zh-CN.json"))
            .unwrap()
            .unwrap();
        assert_eq!(table.get("nihao").map(String::as_str), Some("你好"));
        assert!(dir.path().join("locales/en-US.json").exists());
    }

    #[test]
    fn test_result_serializes_to_json() {
        let dir = project(&[("src/a.ts", "export const a = '你好';\n")]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process.execute(&ProcessOptions::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["scannedFiles"], 1);
        assert_eq!(json["extractedTexts"], 1);
        assert_eq!(
            json["extracted"],
            serde_json::json!([{ "text": "你好", "key": "nihao" }])
        );
    }

    #[test]
    fn test_replace_rewrites_and_shares_keys() {
        let dir = project(&[
            ("src/a.tsx", "export const A = () => <p title=\"保存\">你好</p>;\n"),
            ("src/b.ts", "export const b = '你好';\n"),
        ]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process.execute(&replace()).unwrap();

        assert_eq!(result.success_files, 2);
        assert_eq!(result.replaced_files.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/a.tsx")).unwrap(),
            "export const A = () => <p title={$t(\"baocun\")}>{$t('nihao')}</p>;\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("src/b.ts")).unwrap(),
            "export const b = $t('nihao');\n"
        );
        assert_eq!(process.store().count(None), 2);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = project(&[("src/a.ts", "export const a = '你好';\n")]);
        Process::new(Config::default(), dir.path())
            .unwrap()
            .execute(&replace())
            .unwrap();

        let mut again = Process::new(Config::default(), dir.path()).unwrap();
        let result = again.execute(&replace()).unwrap();

        assert_eq!(result.extracted_texts, 0);
        assert!(result.replaced_files.is_empty());
        assert_eq!(again.store().get_key_by_value("你好"), Some("nihao"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let source = "export const a = '你好';\n";
        let dir = project(&[("src/a.ts", source)]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process
            .execute(&ProcessOptions {
                dry_run: true,
                ..replace()
            })
            .unwrap();

        assert_eq!(result.replaced_files.len(), 1);
        assert!(result.locale_files.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("src/a.ts")).unwrap(), source);
        assert!(!dir.path().join("locales").exists());
    }

    #[test]
    fn test_parse_failure_is_per_file() {
        let dir = project(&[
            ("src/bad.ts", "const = '你好';\n"),
            ("src/good.ts", "export const a = '世界';\n"),
        ]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process.execute(&replace()).unwrap();

        assert_eq!(result.success_files, 1);
        assert_eq!(result.failed_files, 1);
        assert!(result.has_failures());
        assert!(result.errors[0].file.ends_with("bad.ts"));
        assert!(result.errors[0].error.contains("Failed to parse"));
    }

    #[test]
    fn test_patterns_and_ignores() {
        let dir = project(&[
            ("app/a.ts", "export const a = '一';\n"),
            ("app/skip.ts", "export const b = '二';\n"),
            ("src/c.ts", "export const c = '三';\n"),
        ]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();

        let result = process
            .execute(&ProcessOptions {
                patterns: vec!["app/**/*.ts".to_string()],
                ignores: vec!["**/skip.ts".to_string()],
                ..Default::default()
            })
            .unwrap();

        assert_eq!(result.scanned_files, 1);
        let texts: Vec<&str> = result.extracted.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["一"]);
    }

    #[test]
    fn test_auto_import() {
        let dir = project(&[(
            "src/a.ts",
            "import x from './x';\nexport const a = '你好';\n",
        )]);
        let mut config = Config::default();
        config.replacement.function_name = "t".to_string();
        config.replacement.auto_import.imports.insert(
            "t".to_string(),
            ImportSpec {
                import_statement: "import { t } from '@/i18n';".to_string(),
            },
        );
        let mut process = Process::new(config, dir.path()).unwrap();

        process
            .execute(&ProcessOptions {
                auto_import: true,
                ..replace()
            })
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("src/a.ts")).unwrap(),
            "import x from './x';\nimport { t } from '@/i18n';\nexport const a = t('nihao');\n"
        );
    }

    struct Upper;

    #[async_trait]
    impl TranslationProvider for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        async fn translate(
            &self,
            text: &str,
            options: &TranslateOptions,
        ) -> Result<TranslationResult, TranslationError> {
            Ok(TranslationResult {
                source: text.to_string(),
                target: format!("{}:{}->{}", text, options.from, options.to),
                from: options.from.clone(),
                to: options.to.clone(),
                provider: "upper".to_string(),
                extra: None,
            })
        }

        fn is_config_valid(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_translate_fills_target_locales() {
        let dir = project(&[("src/a.ts", "export const a = '你好';\n")]);
        let mut config = Config::default();
        config.translation.provider = "upper".to_string();
        let mut registry = ProviderRegistry::new();
        registry.register("upper", |_| Ok(Arc::new(Upper)));

        let mut process = Process::new(config, dir.path())
            .unwrap()
            .with_registry(registry);
        process.execute(&ProcessOptions::default()).unwrap();

        let summaries = process
            .translate(&["en-US".to_string(), "ja-JP".to_string()], None, None)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.success_count == 1));

        let en = read_locale_file(&dir.path().join("locales/en-US.json"))
            .unwrap()
            .unwrap();
        assert_eq!(en.get("nihao").map(String::as_str), Some("你好:zh->en"));
        let ja = read_locale_file(&dir.path().join("locales/ja-JP.json"))
            .unwrap()
            .unwrap();
        assert_eq!(ja.get("nihao").map(String::as_str), Some("你好:zh->ja"));
    }

    #[tokio::test]
    async fn test_translate_without_credentials_fails() {
        let dir = project(&[]);
        let mut process = Process::new(Config::default(), dir.path()).unwrap();
        assert!(process
            .translate(&["en-US".to_string()], None, None)
            .await
            .is_err());
    }
}
