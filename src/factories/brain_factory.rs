use std::sync::Arc;

use tracing::info;

use crate::brain::{IntentParser, LexiBrain};
use crate::config::Config;
use crate::error::Result;
use crate::interfaces::providers::IntentClassifier;
use crate::plugins::http::build_client;
use crate::plugins::news::NewsPlugin;
use crate::plugins::registry::PluginRegistry;
use crate::plugins::search::SearchPlugin;
use crate::plugins::weather::WeatherPlugin;
use crate::plugins::youtube::YoutubePlugin;
use crate::providers::openrouter::OpenRouterClassifier;

pub struct LexiBrainFactory;

impl LexiBrainFactory {
    /// Wires all four plugins and, when an AI key is present, the remote classifier.
    /// Missing credentials are not an error here; they surface per request.
    pub fn create_from_config(config: &Config) -> Result<LexiBrain> {
        let client = build_client(config.timeout())?;

        let registry = PluginRegistry::new()
            .with(Arc::new(WeatherPlugin::new(client.clone(), config.weather.as_ref())))
            .with(Arc::new(NewsPlugin::new(client.clone(), config.news.as_ref())))
            .with(Arc::new(SearchPlugin::new(client.clone(), config.search.as_ref())))
            .with(Arc::new(YoutubePlugin::new(client.clone(), config.youtube.as_ref())));

        let classifier = config
            .ai
            .as_ref()
            .and_then(|ai| OpenRouterClassifier::from_config(client, ai))
            .map(|c| Arc::new(c) as Arc<dyn IntentClassifier>);

        let status = config.plugin_status();
        info!(
            ai_fallback = status.brain,
            weather = status.weather,
            news = status.news,
            search = status.search,
            youtube = status.youtube,
            "lexi brain wired"
        );

        Ok(LexiBrain::new(IntentParser::new(classifier), registry))
    }
}
