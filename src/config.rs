use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::classifier::{Classifier, MatchMode};
use crate::core::file_scanner::compile_glob;
use crate::core::key_store::{CollisionStrategy, KeyGenerationPolicy, LocaleFiles};
use crate::core::scan::QuoteStyle;
use crate::translation::ProviderRegistry;

pub const CONFIG_FILE_NAME: &str = "i18n-xy.config.json";

pub const ENV_OUTPUT_DIR: &str = "I18N_XY_OUTPUT_DIR";
pub const ENV_BAIDU_APPID: &str = "BAIDU_TRANSLATE_APPID";
pub const ENV_BAIDU_KEY: &str = "BAIDU_TRANSLATE_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Locale the source text is written in.
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub key_generation: KeyGenerationConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub replacement: ReplacementConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

fn default_fallback_locale() -> String {
    "en-US".to_string()
}

fn default_output_dir() -> String {
    "locales".to_string()
}

fn default_include() -> Vec<String> {
    ["src", "pages", "components"]
        .iter()
        .map(|dir| format!("{}/**/*.{{js,jsx,ts,tsx}}", dir))
        .collect()
}

fn default_exclude() -> Vec<String> {
    [
        "node_modules/**",
        "dist/**",
        "build/**",
        "**/*.test.{js,jsx,ts,tsx}",
        "**/*.spec.{js,jsx,ts,tsx}",
    ]
    .map(String::from)
    .to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyGenerationConfig {
    pub max_chinese_length: usize,
    pub hash_length: usize,
    pub max_retry_count: usize,
    pub reuse_existing_key: bool,
    pub duplicate_key_suffix: CollisionStrategy,
    pub key_prefix: String,
    pub separator: String,
}

impl Default for KeyGenerationConfig {
    fn default() -> Self {
        let policy = KeyGenerationPolicy::default();
        Self {
            max_chinese_length: policy.max_primary_length,
            hash_length: policy.hash_length,
            max_retry_count: policy.max_retry_count,
            reuse_existing_key: policy.reuse_existing_key,
            duplicate_key_suffix: policy.collision_strategy,
            key_prefix: policy.key_prefix,
            separator: policy.separator,
        }
    }
}

impl KeyGenerationConfig {
    pub fn policy(&self) -> KeyGenerationPolicy {
        KeyGenerationPolicy {
            max_primary_length: self.max_chinese_length,
            hash_length: self.hash_length,
            reuse_existing_key: self.reuse_existing_key,
            collision_strategy: self.duplicate_key_suffix,
            key_prefix: self.key_prefix.clone(),
            separator: self.separator.clone(),
            max_retry_count: self.max_retry_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherConfig {
    pub mode: MatchMode,
    pub exclude_comments: bool,
    /// Regular expressions; text matching any of them is never extracted.
    pub exclude_patterns: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::Any,
            exclude_comments: true,
            exclude_patterns: Vec::new(),
        }
    }
}

impl MatcherConfig {
    pub fn classifier(&self) -> Result<Classifier> {
        Classifier::new(self.mode, self.exclude_comments, &self.exclude_patterns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub pretty_json: bool,
    pub locale_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            locale_file_name: "{locale}.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Minimal,
    #[default]
    Normal,
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertPosition {
    #[default]
    AfterImports,
    BeforeImports,
    TopOfFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    pub import_statement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoImportConfig {
    pub enabled: bool,
    pub insert_position: InsertPosition,
    /// Import statement to insert, keyed by the function name it binds.
    pub imports: BTreeMap<String, ImportSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplacementConfig {
    pub function_name: String,
    pub quote: QuoteStyle,
    pub auto_import: AutoImportConfig,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        Self {
            function_name: "$t".to_string(),
            quote: QuoteStyle::Single,
            auto_import: AutoImportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaiduConfig {
    pub appid: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationConfig {
    pub enabled: bool,
    pub provider: String,
    pub default_source_lang: String,
    pub default_target_lang: String,
    pub concurrency: usize,
    pub retry_times: usize,
    /// Milliseconds to wait before retrying a failed task.
    pub retry_delay: u64,
    /// Milliseconds to wait between finishing one task and starting the next.
    pub batch_delay: u64,
    pub baidu: BaiduConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "baidu".to_string(),
            default_source_lang: "zh".to_string(),
            default_target_lang: "en".to_string(),
            concurrency: 10,
            retry_times: 3,
            retry_delay: 0,
            batch_delay: 0,
            baidu: BaiduConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            fallback_locale: default_fallback_locale(),
            output_dir: default_output_dir(),
            include: default_include(),
            exclude: default_exclude(),
            key_generation: KeyGenerationConfig::default(),
            matcher: MatcherConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            replacement: ReplacementConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Everything checked here is fatal at startup; file and task level
    /// problems are reported later without aborting the run.
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            bail!("'locale' must not be empty");
        }
        if self.output_dir.trim().is_empty() {
            bail!("'outputDir' must not be empty");
        }
        if self.replacement.function_name.trim().is_empty() {
            bail!("'replacement.functionName' must not be empty");
        }
        if !self.output.locale_file_name.contains("{locale}") {
            bail!(
                "'output.localeFileName' must contain a {{locale}} placeholder: \"{}\"",
                self.output.locale_file_name
            );
        }
        if self.replacement.quote == QuoteStyle::Backtick {
            bail!("'replacement.quote' must be \"single\" or \"double\"");
        }

        for pattern in &self.include {
            compile_glob(pattern)
                .with_context(|| format!("Invalid glob pattern in 'include': \"{}\"", pattern))?;
        }
        for pattern in &self.exclude {
            compile_glob(pattern)
                .with_context(|| format!("Invalid glob pattern in 'exclude': \"{}\"", pattern))?;
        }

        self.matcher
            .classifier()
            .context("Invalid 'matcher.excludePatterns'")?;

        let kg = &self.key_generation;
        if kg.hash_length == 0 || kg.hash_length > 32 {
            bail!(
                "'keyGeneration.hashLength' must be between 1 and 32, got {}",
                kg.hash_length
            );
        }

        let registry = ProviderRegistry::with_builtin();
        if !registry.contains(&self.translation.provider) {
            bail!(
                "Unknown translation provider \"{}\" (available: {})",
                self.translation.provider,
                registry.names().join(", ")
            );
        }
        if self.translation.concurrency == 0 {
            bail!("'translation.concurrency' must be greater than 0");
        }

        Ok(())
    }

    /// Override values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(ENV_OUTPUT_DIR) {
            self.output_dir = dir;
        }
        if let Some(appid) = non_empty(ENV_BAIDU_APPID) {
            self.translation.baidu.appid = appid;
        }
        if let Some(key) = non_empty(ENV_BAIDU_KEY) {
            self.translation.baidu.key = key;
        }
    }

    /// Output directory resolved against `root`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    /// Make sure the output directory exists or can be created.
    pub fn ensure_output_dir(&self, root: &Path) -> Result<PathBuf> {
        let path = self.output_path(root);
        fs::create_dir_all(&path)
            .with_context(|| format!("Output directory is not writable: {}", path.display()))?;
        Ok(path)
    }

    pub fn locale_files(&self, root: &Path) -> LocaleFiles {
        LocaleFiles {
            output_dir: self.output_path(root),
            file_name: self.output.locale_file_name.clone(),
            pretty: self.output.pretty_json,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory the config was found in, or the start directory.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

/// Find and load the config file, apply environment overrides and validate.
pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => load_config_file(&path),
        None => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                root: start_dir.to_path_buf(),
                from_file: false,
            })
        }
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigLoadResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config.apply_env_overrides();
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ConfigLoadResult {
        config,
        root,
        from_file: true,
    })
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.fallback_locale, "en-US");
        assert_eq!(config.output_dir, "locales");
        assert_eq!(config.replacement.function_name, "$t");
        assert_eq!(config.translation.concurrency, 10);
        assert_eq!(config.include[0], "src/**/*.{js,jsx,ts,tsx}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_sections() {
        let json = r#"{
              "locale": "zh-TW",
              "keyGeneration": { "keyPrefix": "app", "duplicateKeySuffix": "counter" },
              "translation": { "concurrency": 2 }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.locale, "zh-TW");
        assert_eq!(config.key_generation.key_prefix, "app");
        assert_eq!(
            config.key_generation.duplicate_key_suffix,
            CollisionStrategy::Counter
        );
        assert_eq!(config.key_generation.hash_length, 6);
        assert_eq!(config.translation.concurrency, 2);
        assert_eq!(config.translation.retry_times, 3);
        assert_eq!(config.output_dir, "locales");
    }

    #[test]
    fn test_policy_from_config() {
        let config: Config =
            serde_json::from_str(r#"{ "keyGeneration": { "maxChineseLength": 4 } }"#).unwrap();
        let policy = config.key_generation.policy();
        assert_eq!(policy.max_primary_length, 4);
        assert_eq!(policy.separator, "_");
    }

    #[test]
    fn test_auto_import_config() {
        let json = r#"{
            "replacement": {
                "functionName": "t",
                "quote": "double",
                "autoImport": {
                    "enabled": true,
                    "insertPosition": "topOfFile",
                    "imports": { "t": { "importStatement": "import { t } from 'i18n';" } }
                }
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let auto = &config.replacement.auto_import;

        assert_eq!(config.replacement.quote, QuoteStyle::Double);
        assert!(auto.enabled);
        assert_eq!(auto.insert_position, InsertPosition::TopOfFile);
        assert_eq!(
            auto.imports["t"].import_statement,
            "import { t } from 'i18n';"
        );
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "outputDir": "i18n" }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.root, dir.path());
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.include, default_include());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides_from(|name| match name {
            ENV_OUTPUT_DIR => Some("out".to_string()),
            ENV_BAIDU_APPID => Some("app".to_string()),
            ENV_BAIDU_KEY => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.output_dir, "out");
        assert_eq!(config.translation.baidu.appid, "app");
        assert_eq!(config.translation.baidu.key, "");
    }

    #[test]
    fn test_validate_invalid_include_pattern() {
        let config = Config {
            include: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("include"));
    }

    #[test]
    fn test_validate_brace_patterns() {
        let config = Config {
            exclude: vec!["**/*.{test,spec}.{js,ts}".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = Config {
            exclude: vec!["**/*.{js,ts".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("exclude"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = Config::default();
        config.translation.provider = "nope".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("nope"));
        assert!(err.contains("baidu"));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut config = Config::default();
        config.translation.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_required_fields() {
        let config = Config {
            locale: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.locale_file_name = "messages.json".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.matcher.exclude_patterns = vec!["(".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_value_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "translation": { "concurrency": 0 } }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_ensure_output_dir() {
        let dir = tempdir().unwrap();
        let config = Config {
            output_dir: "nested/locales".to_string(),
            ..Default::default()
        };
        let path = config.ensure_output_dir(dir.path()).unwrap();
        assert!(path.is_dir());

        fs::write(dir.path().join("file"), "").unwrap();
        let blocked = Config {
            output_dir: "file/locales".to_string(),
            ..Default::default()
        };
        assert!(blocked.ensure_output_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_roundtrips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"fallbackLocale\": \"en-US\""));
        let config: Config = serde_json::from_str(&json).unwrap();
        assert!(config.validate().is_ok());
    }
}
