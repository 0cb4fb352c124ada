use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::{ServiceConfig, DEFAULT_SEARCH_BASE_URL};
use crate::domains::response::{PluginData, PluginResult, ResultType, SearchData, SearchHit};
use crate::error::{LexiError, Result};
use crate::interfaces::plugins::{Plugin, PluginKind, PluginRequest};
use crate::plugins::http::{fetch_json, text_or, Endpoint};

const RESULT_COUNT: u32 = 10;

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
    #[serde(rename = "searchInformation")]
    search_information: Option<SearchInformation>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    position: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchInformation {
    #[serde(rename = "totalResults")]
    total_results: Option<Value>,
}

/// Providers report the total either as a number or as a digit string.
fn parse_total(value: Option<Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Web search through a Serper-style endpoint.
pub struct SearchPlugin {
    client: Client,
    endpoint: Endpoint,
}

impl SearchPlugin {
    pub fn new(client: Client, config: Option<&ServiceConfig>) -> Self {
        Self {
            client,
            endpoint: Endpoint::new(config, DEFAULT_SEARCH_BASE_URL),
        }
    }

    pub async fn lookup(&self, query: &str) -> PluginResult {
        let Some(api_key) = self.endpoint.api_key() else {
            return PluginResult::failure(
                ResultType::Search,
                "Web search service is not configured. Please add LEXI_SERPER_API_KEY to your environment.",
            );
        };
        if query.trim().is_empty() {
            return PluginResult::failure(
                ResultType::Search,
                "Please specify what you'd like me to search for.",
            );
        }

        match self.fetch_results(query, api_key).await {
            Ok(data) if !data.results.is_empty() => {
                let summary = search_summary(&data);
                PluginResult::success(PluginData::Search(data), summary)
            }
            Ok(_) => PluginResult::failure(
                ResultType::Search,
                format!(
                    "I couldn't find any results for \"{query}\". Please try a different search term."
                ),
            ),
            Err(err) => {
                warn!(error = %err, query, "web search failed");
                PluginResult::failure(
                    ResultType::Search,
                    "I couldn't perform the web search right now. Please try again later.",
                )
            }
        }
    }

    async fn fetch_results(&self, query: &str, api_key: &str) -> Result<SearchData> {
        let body: SerperResponse = fetch_json(
            self.client
                .post(self.endpoint.url("/search"))
                .header("X-API-KEY", api_key)
                .json(&json!({"q": query, "num": RESULT_COUNT})),
            "Search API",
        )
        .await?;

        let results = body
            .organic
            .into_iter()
            .enumerate()
            .map(|(idx, hit)| SearchHit {
                title: text_or(hit.title, "No title"),
                link: text_or(hit.link, "#"),
                snippet: text_or(hit.snippet, "No description available"),
                position: hit.position.unwrap_or(idx as u32 + 1),
            })
            .collect();

        Ok(SearchData {
            results,
            total_results: parse_total(body.search_information.and_then(|info| info.total_results)),
            query: query.to_string(),
        })
    }
}

pub fn search_summary(data: &SearchData) -> String {
    if data.results.is_empty() {
        return format!("I couldn't find any results for \"{}\".", data.query);
    }
    let titles = data
        .results
        .iter()
        .take(3)
        .map(|r| r.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "I found {} results for \"{}\". Here are the top results: {titles}",
        data.results.len(),
        data.query
    )
}

#[async_trait]
impl Plugin for SearchPlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::Search
    }

    fn description(&self) -> &str {
        "General web search"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.api_key().is_some()
    }

    async fn execute(&self, request: PluginRequest) -> Result<PluginResult> {
        match request {
            PluginRequest::Search { query } => Ok(self.lookup(&query).await),
            other => Err(LexiError::Runtime(format!(
                "search plugin cannot handle a {} request",
                other.kind()
            ))),
        }
    }
}
