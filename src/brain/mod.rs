pub mod intent_parser;

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info_span, Instrument};

use crate::domains::response::BrainResponse;
use crate::error::Result;
use crate::interfaces::plugins::PluginRequest;
use crate::plugins::registry::{PluginInfo, PluginRegistry};

pub use intent_parser::IntentParser;

/// Single entry point from the UI layer: utterance in, fully formed response out.
#[derive(Clone)]
pub struct LexiBrain {
    parser: IntentParser,
    registry: PluginRegistry,
}

impl LexiBrain {
    pub fn new(parser: IntentParser, registry: PluginRegistry) -> Self {
        Self { parser, registry }
    }

    pub fn capabilities(&self) -> Vec<PluginInfo> {
        self.registry.list()
    }

    /// Never fails and never panics outward. Errors and panics anywhere in the
    /// pipeline collapse into a `general` failure response.
    pub async fn process_user_input(&self, text: &str) -> BrainResponse {
        let span = info_span!("process_user_input", chars = text.chars().count());
        let outcome = AssertUnwindSafe(self.route(text))
            .catch_unwind()
            .instrument(span)
            .await;
        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                error!(error = %err, "brain processing error");
                BrainResponse::pipeline_error()
            }
            Err(_) => {
                error!("brain processing panicked");
                BrainResponse::pipeline_error()
            }
        }
    }

    async fn route(&self, text: &str) -> Result<BrainResponse> {
        let Some(intent) = self.parser.parse_intent(text).await else {
            debug!("no intent recognised");
            return Ok(BrainResponse::not_understood());
        };

        let Some(kind) = intent.kind() else {
            debug!(plugin = ?intent.plugin, "intent names no known capability");
            return Ok(BrainResponse::no_capability());
        };
        let Some(plugin) = self.registry.get(kind) else {
            debug!(plugin = %kind, "capability has no registered plugin");
            return Ok(BrainResponse::no_capability());
        };

        let request = PluginRequest::from_parameters(kind, &intent.parameters);
        debug!(plugin = %kind, confidence = intent.confidence, "dispatching");
        let result = plugin.execute(request).await?;
        Ok(BrainResponse::from_plugin(kind, result))
    }
}
