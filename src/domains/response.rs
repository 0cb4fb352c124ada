use serde::{Serialize, Serializer};

use crate::interfaces::plugins::PluginKind;

pub const NO_INTENT_SUMMARY: &str = "I didn't understand that. Could you try rephrasing?";
pub const NO_CAPABILITY_SUMMARY: &str = "I don't have that capability yet.";
pub const PIPELINE_ERROR_SUMMARY: &str =
    "I encountered an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Weather,
    News,
    Search,
    Youtube,
    General,
}

impl From<PluginKind> for ResultType {
    fn from(kind: PluginKind) -> Self {
        match kind {
            PluginKind::Weather => ResultType::Weather,
            PluginKind::News => ResultType::News,
            PluginKind::Search => ResultType::Search,
            PluginKind::Youtube => ResultType::Youtube,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    pub location: String,
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    pub description: String,
    /// Percent.
    pub humidity: u32,
    /// Metres per second.
    pub wind_speed: f64,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsData {
    pub articles: Vec<NewsArticle>,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    pub results: Vec<SearchHit>,
    pub total_results: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
    /// `H:MM:SS` or `M:SS`, or `Unknown`.
    pub duration: String,
    /// `<n>[K|M] views`, or `Unknown views`.
    pub view_count: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeData {
    pub videos: Vec<YoutubeVideo>,
    pub total_results: u64,
    pub query: String,
}

/// Successful payload, one variant per plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginData {
    Weather(WeatherData),
    News(NewsData),
    Search(SearchData),
    Youtube(YoutubeData),
}

impl PluginData {
    pub fn result_type(&self) -> ResultType {
        match self {
            PluginData::Weather(_) => ResultType::Weather,
            PluginData::News(_) => ResultType::News,
            PluginData::Search(_) => ResultType::Search,
            PluginData::Youtube(_) => ResultType::Youtube,
        }
    }
}

/// Outcome of one plugin invocation.
///
/// Fields are private so that `data` is present exactly when the result is a
/// success; the `type` tag of a success is always the variant of its data.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    result_type: ResultType,
    data: Option<PluginData>,
    summary: String,
}

impl PluginResult {
    pub fn success(data: PluginData, summary: impl Into<String>) -> Self {
        Self {
            result_type: data.result_type(),
            data: Some(data),
            summary: summary.into(),
        }
    }

    pub fn failure(result_type: ResultType, summary: impl Into<String>) -> Self {
        Self {
            result_type,
            data: None,
            summary: summary.into(),
        }
    }

    pub fn general_failure(summary: impl Into<String>) -> Self {
        Self::failure(ResultType::General, summary)
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn data(&self) -> Option<&PluginData> {
        self.data.as_ref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

#[derive(Serialize)]
struct PluginResultWire<'a> {
    success: bool,
    #[serde(rename = "type")]
    result_type: ResultType,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a PluginData>,
    summary: &'a str,
}

impl Serialize for PluginResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PluginResultWire {
            success: self.is_success(),
            result_type: self.result_type,
            data: self.data.as_ref(),
            summary: &self.summary,
        }
        .serialize(serializer)
    }
}

/// Envelope handed back to the UI layer for every utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainResponse {
    pub plugin_used: Option<PluginKind>,
    pub result: PluginResult,
    pub should_speak: bool,
    pub should_show_card: bool,
}

impl BrainResponse {
    pub fn from_plugin(kind: PluginKind, result: PluginResult) -> Self {
        let should_show_card = result.is_success();
        Self {
            plugin_used: Some(kind),
            result,
            should_speak: true,
            should_show_card,
        }
    }

    pub fn general(summary: &str) -> Self {
        Self {
            plugin_used: None,
            result: PluginResult::general_failure(summary),
            should_speak: true,
            should_show_card: false,
        }
    }

    pub fn not_understood() -> Self {
        Self::general(NO_INTENT_SUMMARY)
    }

    pub fn no_capability() -> Self {
        Self::general(NO_CAPABILITY_SUMMARY)
    }

    pub fn pipeline_error() -> Self {
        Self::general(PIPELINE_ERROR_SUMMARY)
    }
}
