use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domains::intent::Parameters;
use crate::domains::response::PluginResult;
use crate::error::Result;

/// The closed set of capabilities the brain can route to, in pattern-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Weather,
    News,
    Search,
    Youtube,
}

impl PluginKind {
    pub const ALL: [PluginKind; 4] = [
        PluginKind::Weather,
        PluginKind::News,
        PluginKind::Search,
        PluginKind::Youtube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Weather => "weather",
            PluginKind::News => "news",
            PluginKind::Search => "search",
            PluginKind::Youtube => "youtube",
        }
    }

    /// Exact, case-sensitive lookup; anything else is an unregistered capability.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_LOCATION: &str = "current location";
pub const DEFAULT_TOPIC: &str = "general";

/// Typed parameters for one plugin invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginRequest {
    Weather { location: String },
    News { topic: String },
    Search { query: String },
    Youtube { query: String },
}

impl PluginRequest {
    /// Builds the typed request for `kind`, substituting the per-plugin default
    /// when the expected key is absent or empty.
    pub fn from_parameters(kind: PluginKind, parameters: &Parameters) -> Self {
        let value = |key: &str, default: &str| {
            parameters
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        match kind {
            PluginKind::Weather => PluginRequest::Weather {
                location: value("location", DEFAULT_LOCATION),
            },
            PluginKind::News => PluginRequest::News {
                topic: value("topic", DEFAULT_TOPIC),
            },
            PluginKind::Search => PluginRequest::Search {
                query: value("query", ""),
            },
            PluginKind::Youtube => PluginRequest::Youtube {
                query: value("query", ""),
            },
        }
    }

    pub fn kind(&self) -> PluginKind {
        match self {
            PluginRequest::Weather { .. } => PluginKind::Weather,
            PluginRequest::News { .. } => PluginKind::News,
            PluginRequest::Search { .. } => PluginKind::Search,
            PluginRequest::Youtube { .. } => PluginKind::Youtube,
        }
    }
}

/// One capability backed by an external API.
///
/// Every expected failure (missing credential, empty parameter, upstream
/// error, empty result) comes back as `Ok` with a `success: false` result.
/// `Err` is reserved for conditions the plugin cannot describe to the user.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn kind(&self) -> PluginKind;
    fn description(&self) -> &str;
    fn is_configured(&self) -> bool;
    async fn execute(&self, request: PluginRequest) -> Result<PluginResult>;
}
