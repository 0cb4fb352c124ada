use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{LexiError, Result};

pub const DEFAULT_AI_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_AI_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://google.serper.dev";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com";

pub const ENV_AI_API_KEY: &str = "LEXI_OPENROUTER_API_KEY";
pub const ENV_AI_MODEL: &str = "LEXI_AI_MODEL";
pub const ENV_WEATHER_API_KEY: &str = "LEXI_WEATHER_API_KEY";
pub const ENV_NEWS_API_KEY: &str = "LEXI_NEWS_API_KEY";
pub const ENV_SEARCH_API_KEY: &str = "LEXI_SERPER_API_KEY";
pub const ENV_YOUTUBE_API_KEY: &str = "LEXI_YOUTUBE_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ServiceConfig {
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            base_url: None,
        }
    }

    pub fn with_key_and_base(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            base_url: Some(base_url.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

/// Which credentials are present. Missing ones degrade a feature, they never fail startup.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PluginStatus {
    pub brain: bool,
    pub weather: bool,
    pub news: bool,
    pub search: bool,
    pub youtube: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub ai: Option<AiConfig>,
    #[serde(default)]
    pub weather: Option<ServiceConfig>,
    #[serde(default)]
    pub news: Option<ServiceConfig>,
    #[serde(default)]
    pub search: Option<ServiceConfig>,
    #[serde(default)]
    pub youtube: Option<ServiceConfig>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

/// Returns the key only when it holds something other than whitespace.
pub fn usable_key(key: Option<&String>) -> Option<&str> {
    key.map(|k| k.trim()).filter(|k| !k.is_empty())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn fill_service_key(slot: &mut Option<ServiceConfig>, env_name: &str) {
    let service = slot.get_or_insert_with(ServiceConfig::default);
    if usable_key(service.api_key.as_ref()).is_none() {
        if let Some(value) = env_value(env_name) {
            service.api_key = Some(value);
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            LexiError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| LexiError::Config(e.to_string()))
    }

    pub fn from_env() -> Self {
        Self::default().resolve_env()
    }

    /// Fills every credential that is still missing from the `LEXI_*` environment.
    pub fn resolve_env(mut self) -> Self {
        let ai = self.ai.get_or_insert_with(AiConfig::default);
        if usable_key(ai.api_key.as_ref()).is_none() {
            if let Some(value) = env_value(ENV_AI_API_KEY) {
                ai.api_key = Some(value);
            }
        }
        if ai.model.is_none() {
            ai.model = env_value(ENV_AI_MODEL);
        }
        fill_service_key(&mut self.weather, ENV_WEATHER_API_KEY);
        fill_service_key(&mut self.news, ENV_NEWS_API_KEY);
        fill_service_key(&mut self.search, ENV_SEARCH_API_KEY);
        fill_service_key(&mut self.youtube, ENV_YOUTUBE_API_KEY);
        self
    }

    pub fn ai_api_key(&self) -> Option<&str> {
        self.ai.as_ref().and_then(|ai| usable_key(ai.api_key.as_ref()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.http
            .as_ref()
            .and_then(|http| http.timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn plugin_status(&self) -> PluginStatus {
        let configured = |service: &Option<ServiceConfig>| {
            service
                .as_ref()
                .and_then(|s| usable_key(s.api_key.as_ref()))
                .is_some()
        };
        PluginStatus {
            brain: self.ai_api_key().is_some(),
            weather: configured(&self.weather),
            news: configured(&self.news),
            search: configured(&self.search),
            youtube: configured(&self.youtube),
        }
    }
}
