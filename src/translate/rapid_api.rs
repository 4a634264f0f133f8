use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::interface::{TranslateInterface, TranslateRequest};
use super::languages;
use crate::config::TranslationConfig;
use crate::envelope::Translation;
use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
struct TranslateResult {
    #[serde(default)]
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    #[serde(default)]
    text: String,
}

/// Microsoft Translator reached through RapidAPI
#[derive(Debug, Clone)]
pub struct RapidApiTranslator {
    client: Client,
    base_url: String,
    api_host: String,
    api_key: String,
    timeout: Duration,
}

impl RapidApiTranslator {
    /// `None` when no API key is configured
    pub fn from_config(config: &TranslationConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_host: config.api_host.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn request_translation(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/translate", self.base_url);

        let mut params = vec![("api-version", "3.0"), ("to", target_lang)];
        if let Some(source) = source_lang {
            params.push(("from", source));
        }

        debug!("Sending translation request to {} with params {:?}", url, params);

        let response = self
            .client
            .post(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .query(&params)
            .json(&json!([{ "text": text }]))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Translation API responded {}: {}", status, body);

        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let results: Vec<TranslateResult> = serde_json::from_str(&body)?;
        Ok(results
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .map(|t| t.text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TranslateInterface for RapidApiTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<Translation, ServiceError> {
        let target_lang = languages::normalize(&request.target_lang);
        let source_lang = request.source_lang.as_deref().map(languages::normalize);

        if request.text.is_empty() {
            return Ok(Translation {
                text: String::new(),
                source_lang: Some(source_lang.unwrap_or_else(|| "auto".to_string())),
                target_lang: Some(target_lang),
            });
        }

        let text = self
            .request_translation(&request.text, &target_lang, source_lang.as_deref())
            .await
            .map_err(|e| {
                error!("RapidAPI translation error: {}", e);
                e
            })?;

        Ok(Translation {
            text,
            source_lang: Some(source_lang.unwrap_or_else(|| "auto".to_string())),
            target_lang: Some(target_lang),
        })
    }
}
