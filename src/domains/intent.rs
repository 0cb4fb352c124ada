use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::interfaces::plugins::PluginKind;

pub type Parameters = BTreeMap<String, String>;

/// Confidence attached to every pattern-table match.
pub const PATTERN_CONFIDENCE: f64 = 0.9;

/// A structured capability request derived from one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Capability name. `None` is general conversation.
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default, deserialize_with = "deserialize_parameters")]
    pub parameters: Parameters,
    #[serde(default)]
    pub confidence: f64,
}

impl Intent {
    pub fn new(plugin: &str, parameters: Parameters, confidence: f64) -> Self {
        Self {
            plugin: Some(plugin.to_string()),
            parameters,
            confidence,
        }
    }

    pub fn from_pattern(kind: PluginKind, parameters: Parameters) -> Self {
        Self::new(kind.as_str(), parameters, PATTERN_CONFIDENCE)
    }

    /// Resolves the plugin name against the closed capability set.
    pub fn kind(&self) -> Option<PluginKind> {
        self.plugin.as_deref().and_then(PluginKind::from_name)
    }
}

/// Accepts any JSON scalar as a parameter value; classifiers are not strict about types.
fn deserialize_parameters<'de, D>(deserializer: D) -> std::result::Result<Parameters, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}
