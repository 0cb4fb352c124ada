use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::brain::intent_parser::intent_from_ai_content;
use crate::config::{AiConfig, DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL};
use crate::domains::intent::Intent;
use crate::error::{LexiError, Result};
use crate::interfaces::providers::IntentClassifier;

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.1;

const SYSTEM_PROMPT: &str = r#"Analyze this user input and determine the intent. Return ONLY a JSON object with this structure:
{
  "plugin": "weather|news|search|youtube|null",
  "parameters": {"key": "value"},
  "confidence": 0.0-1.0
}

Available plugins:
- weather: for weather queries
- news: for news and headlines
- search: for web searches
- youtube: for video searches
- null: for general conversation

Examples:
"weather in New York" → {"plugin": "weather", "parameters": {"location": "New York"}, "confidence": 0.9}
"latest news" → {"plugin": "news", "parameters": {"topic": "general"}, "confidence": 0.9}
"search for AI conferences" → {"plugin": "search", "parameters": {"query": "AI conferences"}, "confidence": 0.9}
"play funny cat videos" → {"plugin": "youtube", "parameters": {"query": "funny cat videos"}, "confidence": 0.8}
"hello how are you" → {"plugin": null, "parameters": {}, "confidence": 0.9}"#;

/// Chat-completion backed classifier for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenRouterClassifier {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClassifier {
    pub fn new(client: Client, api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
        }
    }

    /// `None` when the config carries no usable key.
    pub fn from_config(client: Client, config: &AiConfig) -> Option<Self> {
        let api_key = crate::config::usable_key(config.api_key.as_ref())?.to_string();
        Some(Self::new(
            client,
            api_key,
            config.model.clone(),
            config.base_url.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn payload(&self, input: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": input}
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }
}

#[async_trait]
impl IntentClassifier for OpenRouterClassifier {
    async fn classify(&self, input: &str) -> Result<Option<Intent>> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(input))
            .send()
            .await
            .map_err(|e| LexiError::Http(format!("AI intent transport failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LexiError::Http(format!(
                "AI intent detection failed ({status}): {body}"
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| LexiError::Serialization(format!("AI intent decode failed: {e}")))?;
        let content = data
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty());

        let Some(content) = content else {
            debug!(model = %self.model, "AI intent reply had no message content");
            return Ok(None);
        };
        intent_from_ai_content(content)
    }
}
