use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ServiceConfig, DEFAULT_YOUTUBE_BASE_URL};
use crate::domains::response::{PluginData, PluginResult, ResultType, YoutubeData, YoutubeVideo};
use crate::error::{LexiError, Result};
use crate::interfaces::plugins::{Plugin, PluginKind, PluginRequest};
use crate::plugins::http::{fetch_json, text_or, Endpoint};

static ISO_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap());

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(default, rename = "totalResults")]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    items: Vec<DetailsItem>,
}

#[derive(Debug, Deserialize)]
struct DetailsItem {
    id: Option<String>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

/// Renders an ISO-8601 `PT#H#M#S` duration as `H:MM:SS` or `M:SS`.
pub fn format_duration(duration: Option<&str>) -> String {
    let Some(captures) = duration.and_then(|d| ISO_DURATION.captures(d)) else {
        return "Unknown".to_string();
    };
    let part = |idx: usize| {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

pub fn format_view_count(view_count: Option<&str>) -> String {
    let Some(count) = view_count.and_then(|v| v.trim().parse::<u64>().ok()) else {
        return "Unknown views".to_string();
    };
    if count >= 1_000_000 {
        format!("{}M views", tenths(count, 1_000_000))
    } else if count >= 1_000 {
        format!("{}K views", tenths(count, 1_000))
    } else {
        format!("{count} views")
    }
}

/// `count / unit` to one decimal place, with ties rounded up.
fn tenths(count: u64, unit: u64) -> String {
    let scaled = (count * 10 + unit / 2) / unit;
    format!("{}.{}", scaled / 10, scaled % 10)
}

fn thumbnail_url(thumbnails: &HashMap<String, Thumbnail>) -> String {
    ["medium", "default"]
        .iter()
        .filter_map(|size| thumbnails.get(*size))
        .find_map(|t| t.url.clone().filter(|u| !u.is_empty()))
        .unwrap_or_default()
}

/// Video search plus a details lookup for duration and view counts.
pub struct YoutubePlugin {
    client: Client,
    endpoint: Endpoint,
}

impl YoutubePlugin {
    pub fn new(client: Client, config: Option<&ServiceConfig>) -> Self {
        Self {
            client,
            endpoint: Endpoint::new(config, DEFAULT_YOUTUBE_BASE_URL),
        }
    }

    pub async fn lookup(&self, query: &str) -> PluginResult {
        let Some(api_key) = self.endpoint.api_key() else {
            return PluginResult::failure(
                ResultType::Youtube,
                "YouTube service is not configured. Please add LEXI_YOUTUBE_API_KEY to your environment.",
            );
        };
        if query.trim().is_empty() {
            return PluginResult::failure(
                ResultType::Youtube,
                "Please specify what you'd like me to search for on YouTube.",
            );
        }

        match self.fetch_videos(query, api_key).await {
            Ok(data) if !data.videos.is_empty() => {
                let summary = youtube_summary(&data);
                PluginResult::success(PluginData::Youtube(data), summary)
            }
            Ok(_) => PluginResult::failure(
                ResultType::Youtube,
                format!(
                    "I couldn't find any YouTube videos for \"{query}\". Please try a different search term."
                ),
            ),
            Err(err) => {
                warn!(error = %err, query, "youtube search failed");
                PluginResult::failure(
                    ResultType::Youtube,
                    "I couldn't search YouTube right now. Please try again later.",
                )
            }
        }
    }

    async fn fetch_videos(&self, query: &str, api_key: &str) -> Result<YoutubeData> {
        let search: SearchResponse = fetch_json(
            self.client.get(self.endpoint.url("/youtube/v3/search")).query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "10"),
                ("key", api_key),
            ]),
            "YouTube Search API",
        )
        .await?;

        let total_results = search.page_info.map(|p| p.total_results).unwrap_or(0);
        if search.items.is_empty() {
            return Ok(YoutubeData {
                videos: Vec::new(),
                total_results,
                query: query.to_string(),
            });
        }

        let ids: Vec<String> = search
            .items
            .iter()
            .filter_map(|item| item.id.as_ref().and_then(|id| id.video_id.clone()))
            .collect();
        let details = self.fetch_details(&ids, api_key).await;

        let videos = search
            .items
            .into_iter()
            .map(|item| {
                let video_id = item.id.and_then(|id| id.video_id).unwrap_or_default();
                let snippet = item.snippet.unwrap_or_default();
                let detail = details.get(&video_id);
                YoutubeVideo {
                    thumbnail: thumbnail_url(&snippet.thumbnails),
                    title: text_or(snippet.title, "No title"),
                    description: text_or(snippet.description, "No description available"),
                    channel_title: text_or(snippet.channel_title, "Unknown channel"),
                    published_at: snippet.published_at.unwrap_or_default(),
                    duration: format_duration(
                        detail
                            .and_then(|d| d.content_details.as_ref())
                            .and_then(|c| c.duration.as_deref()),
                    ),
                    view_count: format_view_count(
                        detail
                            .and_then(|d| d.statistics.as_ref())
                            .and_then(|s| s.view_count.as_deref()),
                    ),
                    video_id,
                }
            })
            .collect();

        Ok(YoutubeData {
            videos,
            total_results,
            query: query.to_string(),
        })
    }

    /// Details only decorate the results, so a failure here degrades to placeholders.
    async fn fetch_details(&self, ids: &[String], api_key: &str) -> HashMap<String, DetailsItem> {
        if ids.is_empty() {
            return HashMap::new();
        }
        let joined = ids.join(",");
        let response: Result<DetailsResponse> = fetch_json(
            self.client.get(self.endpoint.url("/youtube/v3/videos")).query(&[
                ("part", "contentDetails,statistics"),
                ("id", joined.as_str()),
                ("key", api_key),
            ]),
            "YouTube Videos API",
        )
        .await;
        match response {
            Ok(details) => details
                .items
                .into_iter()
                .filter_map(|item| item.id.clone().map(|id| (id, item)))
                .collect(),
            Err(err) => {
                debug!(error = %err, "video details unavailable");
                HashMap::new()
            }
        }
    }
}

pub fn youtube_summary(data: &YoutubeData) -> String {
    match data.videos.first() {
        None => format!("I couldn't find any YouTube videos for \"{}\".", data.query),
        Some(top) => format!(
            "I found {} YouTube videos for \"{}\". Here's the top result: \"{}\" by {}",
            data.videos.len(),
            data.query,
            top.title,
            top.channel_title
        ),
    }
}

#[async_trait]
impl Plugin for YoutubePlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::Youtube
    }

    fn description(&self) -> &str {
        "YouTube video search"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.api_key().is_some()
    }

    async fn execute(&self, request: PluginRequest) -> Result<PluginResult> {
        match request {
            PluginRequest::Youtube { query } => Ok(self.lookup(&query).await),
            other => Err(LexiError::Runtime(format!(
                "youtube plugin cannot handle a {} request",
                other.kind()
            ))),
        }
    }
}
