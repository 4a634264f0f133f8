use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::interface::ChatInterface;
use crate::config::ChatConfig;
use crate::envelope::ChatReply;
use crate::error::ServiceError;

pub const EMPTY_PROMPT_REPLY: &str =
    "I'd be happy to help! Please provide your question or message.";
pub const EMPTY_MODEL_REPLY: &str = "I understand your message. How can I assist you further?";

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: &[&str] = &["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"];

/// Wrap the user's message in the assistant prompt
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are a helpful AI assistant with deep knowledge of diverse topics. \
         Please provide a clear and informative response to help the user.\n\n\
         Question/Message: {}\n\nResponse:",
        text
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<OutgoingPart>,
}

#[derive(Debug, Serialize)]
struct OutgoingPart {
    text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Debug, Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Google Gemini `generateContent` client
pub struct GeminiChat {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    generation_config: GenerationConfig,
    timeout: Duration,
}

impl GeminiChat {
    /// `None` when no API key is configured
    pub fn from_config(config: &ChatConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        info!(
            "Initialized GeminiChat: model={}, temperature={}",
            config.model, config.temperature
        );
        Some(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            generation_config: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
            },
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![OutgoingPart { text: prompt }],
            }],
            generation_config: self.generation_config,
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: GenerateResponse = response.json().await?;
        Ok(result.first_text())
    }
}

#[async_trait]
impl ChatInterface for GeminiChat {
    async fn respond(&self, text: &str) -> Result<ChatReply, ServiceError> {
        if text.trim().is_empty() {
            return Ok(ChatReply {
                response: EMPTY_PROMPT_REPLY.to_string(),
            });
        }

        let reply = self.generate(build_prompt(text)).await.map_err(|e| {
            error!("Chat processing error: {}", e);
            e
        })?;
        debug!("Gemini replied with {} chars", reply.len());

        let response = if reply.is_empty() {
            EMPTY_MODEL_REPLY.to_string()
        } else {
            reply
        };
        Ok(ChatReply { response })
    }
}
