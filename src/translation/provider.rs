use std::{collections::BTreeMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::TranslationConfig;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("unknown translation provider: {0}")]
    UnknownProvider(String),

    #[error("invalid provider config: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("translation task was dropped before completion")]
    Canceled,
}

/// Source and target language codes, in the provider's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslateOptions {
    pub from: String,
    pub to: String,
}

impl TranslateOptions {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub source: String,
    pub target: String,
    pub from: String,
    pub to: String,
    pub provider: String,
    /// Provider-specific payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

/// Remote translation service.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<TranslationResult, TranslationError>;

    /// Translate several texts in one request.
    ///
    /// The default implementation translates them one after another; the
    /// result order always matches `texts`.
    async fn batch_translate(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Result<Vec<TranslationResult>, TranslationError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, options).await?);
        }
        Ok(results)
    }

    /// True if the provider has everything it needs to make requests.
    fn is_config_valid(&self) -> bool;
}

type ProviderFactory = Box<
    dyn Fn(&TranslationConfig) -> Result<Arc<dyn TranslationProvider>, TranslationError>
        + Send
        + Sync,
>;

/// Named provider factories.
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with the built-in providers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(super::baidu::PROVIDER_NAME, |config| {
            let provider = super::baidu::BaiduProvider::from_config(&config.baidu)?;
            Ok(Arc::new(provider) as Arc<dyn TranslationProvider>)
        });
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&TranslationConfig) -> Result<Arc<dyn TranslationProvider>, TranslationError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Build the provider named by `config.provider`.
    pub fn create(
        &self,
        config: &TranslationConfig,
    ) -> Result<Arc<dyn TranslationProvider>, TranslationError> {
        let factory = self
            .factories
            .get(&config.provider)
            .ok_or_else(|| TranslationError::UnknownProvider(config.provider.clone()))?;
        let provider = factory(config)?;
        if !provider.is_config_valid() {
            return Err(TranslationError::Config(format!(
                "provider \"{}\" is missing credentials",
                config.provider
            )));
        }
        Ok(provider)
    }
}
