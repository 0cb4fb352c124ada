use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ServiceConfig, DEFAULT_NEWS_BASE_URL};
use crate::domains::response::{NewsArticle, NewsData, PluginData, PluginResult, ResultType};
use crate::error::{LexiError, Result};
use crate::interfaces::plugins::{Plugin, PluginKind, PluginRequest, DEFAULT_TOPIC};
use crate::plugins::http::{decode_json, fetch_json, text_or, Endpoint};

const PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default, rename = "totalResults")]
    total_results: u64,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    source: Option<Value>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
}

fn source_name(source: Option<Value>) -> String {
    let name = match source {
        Some(Value::String(name)) => Some(name),
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    };
    text_or(name, "Unknown")
}

fn normalize(response: NewsResponse) -> NewsData {
    let articles = response
        .articles
        .into_iter()
        .map(|raw| NewsArticle {
            title: text_or(raw.title, "No title"),
            description: text_or(raw.description, "No description available"),
            url: text_or(raw.url, "#"),
            published_at: raw.published_at.unwrap_or_default(),
            source: source_name(raw.source),
            url_to_image: raw.url_to_image.filter(|v| !v.is_empty()),
        })
        .collect();
    NewsData {
        articles,
        total_results: response.total_results,
    }
}

/// Headlines and topic search against a NewsAPI-style provider.
pub struct NewsPlugin {
    client: Client,
    endpoint: Endpoint,
}

impl NewsPlugin {
    pub fn new(client: Client, config: Option<&ServiceConfig>) -> Self {
        Self {
            client,
            endpoint: Endpoint::new(config, DEFAULT_NEWS_BASE_URL),
        }
    }

    pub async fn lookup(&self, topic: &str) -> PluginResult {
        let Some(api_key) = self.endpoint.api_key() else {
            return PluginResult::failure(
                ResultType::News,
                "News service is not configured. Please add LEXI_NEWS_API_KEY to your environment.",
            );
        };
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };

        match self.fetch_news(topic, api_key).await {
            Ok(data) if !data.articles.is_empty() => {
                let summary = news_summary(&data, topic);
                PluginResult::success(PluginData::News(data), summary)
            }
            Ok(_) => PluginResult::failure(
                ResultType::News,
                format!(
                    "I couldn't find any news articles about {topic}. Please try a different topic."
                ),
            ),
            Err(err) => {
                warn!(error = %err, topic, "news fetch failed");
                PluginResult::failure(
                    ResultType::News,
                    "I couldn't fetch the news right now. Please try again later.",
                )
            }
        }
    }

    async fn fetch_news(&self, topic: &str, api_key: &str) -> Result<NewsData> {
        let general = topic == DEFAULT_TOPIC;
        let query = if general { "top headlines" } else { topic };
        let response = self
            .client
            .get(self.endpoint.url("/v2/everything"))
            .query(&[
                ("q", query),
                ("sortBy", "publishedAt"),
                ("pageSize", PAGE_SIZE),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| LexiError::Http(format!("News API request failed: {e}")))?;

        if general && !response.status().is_success() {
            debug!(status = %response.status(), "everything endpoint refused, trying top headlines");
            let headlines: NewsResponse = fetch_json(
                self.client
                    .get(self.endpoint.url("/v2/top-headlines"))
                    .query(&[("country", "us"), ("pageSize", PAGE_SIZE), ("apiKey", api_key)]),
                "News headlines API",
            )
            .await?;
            return Ok(normalize(headlines));
        }

        let body: NewsResponse = decode_json(response, "News API").await?;
        Ok(normalize(body))
    }
}

pub fn news_summary(data: &NewsData, topic: &str) -> String {
    let topic_text = if topic == DEFAULT_TOPIC {
        "latest news".to_string()
    } else {
        format!("news about {topic}")
    };
    if data.articles.is_empty() {
        return format!("I couldn't find any {topic_text} at the moment.");
    }
    let headlines = data
        .articles
        .iter()
        .take(3)
        .map(|a| a.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Here are the top {} {topic_text} articles: {headlines}",
        data.articles.len()
    )
}

#[async_trait]
impl Plugin for NewsPlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::News
    }

    fn description(&self) -> &str {
        "Latest headlines or news about a topic"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.api_key().is_some()
    }

    async fn execute(&self, request: PluginRequest) -> Result<PluginResult> {
        match request {
            PluginRequest::News { topic } => Ok(self.lookup(&topic).await),
            other => Err(LexiError::Runtime(format!(
                "news plugin cannot handle a {} request",
                other.kind()
            ))),
        }
    }
}
