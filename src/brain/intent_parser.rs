use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domains::intent::{Intent, Parameters};
use crate::interfaces::plugins::{PluginKind, DEFAULT_LOCATION, DEFAULT_TOPIC};
use crate::interfaces::providers::IntentClassifier;

/// Classifier answers at or below this confidence are dropped.
pub const AI_CONFIDENCE_THRESHOLD: f64 = 0.7;

struct PatternTable {
    kind: PluginKind,
    patterns: Vec<Regex>,
}

fn table(kind: PluginKind, sources: &[&str]) -> PatternTable {
    PatternTable {
        kind,
        patterns: sources
            .iter()
            .map(|source| Regex::new(&format!("(?i){source}")).unwrap())
            .collect(),
    }
}

// Order matters twice over: tables are tried top to bottom, and within a
// table the specific phrasings sit above the catch-alls. Reordering changes
// which plugin wins ambiguous phrases.
static PATTERN_TABLES: Lazy<Vec<PatternTable>> = Lazy::new(|| {
    vec![
        table(
            PluginKind::Weather,
            &[
                r"weather in (.+)",
                r"what's the weather in (.+)",
                r"how's the weather in (.+)",
                r"temperature in (.+)",
                r"forecast for (.+)",
                r"weather (.+)",
            ],
        ),
        table(
            PluginKind::News,
            &[
                r"latest news",
                r"top headlines",
                r"news about (.+)",
                r"what's happening",
                r"current events",
                r"news",
            ],
        ),
        table(
            PluginKind::Search,
            &[
                r"search for (.+)",
                r"find (.+)",
                r"look up (.+)",
                r"google (.+)",
                r"web search (.+)",
                r"search (.+)",
            ],
        ),
        table(
            PluginKind::Youtube,
            &[
                r"play (.+) on youtube",
                r"youtube (.+)",
                r"show me (.+) video",
                r"find (.+) video",
                r"watch (.+)",
            ],
        ),
    ]
});

static FENCE_OPEN_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^```json\s*").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*").unwrap());
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Strips markdown fences and surrounding prose, leaving the outermost `{...}` span.
pub fn clean_json_response(content: &str) -> String {
    let cleaned = FENCE_OPEN_JSON.replace(content, "");
    let cleaned = FENCE_CLOSE.replace(&cleaned, "");
    let cleaned = FENCE_OPEN.replace(&cleaned, "");
    let cleaned = cleaned.trim();
    match JSON_OBJECT.find(cleaned) {
        Some(found) => found.as_str().to_string(),
        None => cleaned.to_string(),
    }
}

/// Parses a classifier reply into an intent, applying the confidence gate.
pub fn intent_from_ai_content(content: &str) -> crate::Result<Option<Intent>> {
    let cleaned = clean_json_response(content);
    debug!(original = %content, cleaned = %cleaned, "cleaned classifier reply");
    let intent: Intent = serde_json::from_str(&cleaned)?;
    if intent.confidence > AI_CONFIDENCE_THRESHOLD {
        Ok(Some(intent))
    } else {
        debug!(confidence = intent.confidence, "classifier intent below threshold");
        Ok(None)
    }
}

fn extract_parameters(kind: PluginKind, capture: Option<&str>) -> Parameters {
    let (key, default) = match kind {
        PluginKind::Weather => ("location", DEFAULT_LOCATION),
        PluginKind::News => ("topic", DEFAULT_TOPIC),
        PluginKind::Search | PluginKind::Youtube => ("query", ""),
    };
    let value = capture
        .filter(|c| !c.is_empty())
        .unwrap_or(default)
        .to_string();
    Parameters::from([(key.to_string(), value)])
}

/// Pattern-table lookup only; never touches the network.
pub fn match_patterns(input: &str) -> Option<Intent> {
    let input = input.trim();
    for table in PATTERN_TABLES.iter() {
        for pattern in &table.patterns {
            if let Some(captures) = pattern.captures(input) {
                let capture = captures.get(1).map(|m| m.as_str());
                debug!(plugin = %table.kind, pattern = pattern.as_str(), "pattern matched");
                return Some(Intent::from_pattern(
                    table.kind,
                    extract_parameters(table.kind, capture),
                ));
            }
        }
    }
    None
}

/// Maps free-form text to a capability request.
#[derive(Clone, Default)]
pub struct IntentParser {
    classifier: Option<Arc<dyn IntentClassifier>>,
}

impl IntentParser {
    pub fn new(classifier: Option<Arc<dyn IntentClassifier>>) -> Self {
        Self { classifier }
    }

    pub fn patterns_only() -> Self {
        Self { classifier: None }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Returns `None` when nothing matched; classifier failures are logged and
    /// treated the same way.
    pub async fn parse_intent(&self, text: &str) -> Option<Intent> {
        if let Some(intent) = match_patterns(text) {
            return Some(intent);
        }

        let classifier = self.classifier.as_ref()?;
        let normalized = text.trim().to_lowercase();
        match classifier.classify(&normalized).await {
            Ok(Some(intent)) if intent.confidence > AI_CONFIDENCE_THRESHOLD => Some(intent),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "AI intent detection failed");
                None
            }
        }
    }
}
