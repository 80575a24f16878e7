//! Baidu general translation API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::provider::{TranslateOptions, TranslationError, TranslationProvider, TranslationResult};
use crate::config::BaiduConfig;

pub const PROVIDER_NAME: &str = "baidu";

const ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    #[serde(default)]
    error_code: Option<serde_json::Value>,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    trans_result: Vec<BaiduEntry>,
}

#[derive(Debug, Deserialize)]
struct BaiduEntry {
    src: String,
    dst: String,
}

pub struct BaiduProvider {
    http: reqwest::Client,
    appid: String,
    key: String,
    endpoint: String,
}

impl BaiduProvider {
    pub fn from_config(config: &BaiduConfig) -> Result<Self, TranslationError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            appid: config.appid.clone(),
            key: config.key.clone(),
            endpoint: ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn sign(&self, query: &str, salt: &str) -> String {
        sign(&self.appid, query, salt, &self.key)
    }

    async fn request(
        &self,
        query: &str,
        options: &TranslateOptions,
    ) -> Result<Vec<BaiduEntry>, TranslationError> {
        let salt = Utc::now().timestamp_millis().to_string();
        let sign = self.sign(query, &salt);

        debug!(from = %options.from, to = %options.to, chars = query.chars().count(), "baidu request");
        let response: BaiduResponse = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("q", query),
                ("from", options.from.as_str()),
                ("to", options.to.as_str()),
                ("appid", self.appid.as_str()),
                ("salt", salt.as_str()),
                ("sign", sign.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(response)
    }

    fn result(&self, entry: BaiduEntry, options: &TranslateOptions) -> TranslationResult {
        TranslationResult {
            source: entry.src,
            target: entry.dst,
            from: options.from.clone(),
            to: options.to.clone(),
            provider: PROVIDER_NAME.to_string(),
            extra: None,
        }
    }
}

/// `md5(appid + query + salt + key)` as lowercase hex.
pub fn sign(appid: &str, query: &str, salt: &str, key: &str) -> String {
    let input = format!("{}{}{}{}", appid, query, salt, key);
    format!("{:x}", md5::compute(input.as_bytes()))
}

fn parse_response(response: BaiduResponse) -> Result<Vec<BaiduEntry>, TranslationError> {
    if let Some(code) = response.error_code {
        let code = match code {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        // "52000" is the documented success code.
        if code != "52000" {
            return Err(TranslationError::Provider {
                code,
                message: response.error_msg.unwrap_or_default(),
            });
        }
    }
    if response.trans_result.is_empty() {
        return Err(TranslationError::Decode(
            "response has no trans_result".to_string(),
        ));
    }
    Ok(response.trans_result)
}

#[async_trait]
impl TranslationProvider for BaiduProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<TranslationResult, TranslationError> {
        let entries = self.request(text, options).await?;
        let target = entries
            .into_iter()
            .map(|e| e.dst)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(self.result(
            BaiduEntry {
                src: text.to_string(),
                dst: target,
            },
            options,
        ))
    }

    /// One request with the texts joined by newlines; entries map back by position.
    async fn batch_translate(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Result<Vec<TranslationResult>, TranslationError> {
        if texts.iter().any(|t| t.contains('\n')) {
            return Err(TranslationError::Decode(
                "multi-line text cannot be batched".to_string(),
            ));
        }

        let entries = self.request(&texts.join("\n"), options).await?;
        if entries.len() != texts.len() {
            return Err(TranslationError::Decode(format!(
                "expected {} results, got {}",
                texts.len(),
                entries.len()
            )));
        }

        Ok(texts
            .iter()
            .zip(entries)
            .map(|(text, entry)| {
                self.result(
                    BaiduEntry {
                        src: text.clone(),
                        dst: entry.dst,
                    },
                    options,
                )
            })
            .collect())
    }

    fn is_config_valid(&self) -> bool {
        !self.appid.trim().is_empty() && !self.key.trim().is_empty()
    }
}
