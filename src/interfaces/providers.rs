use async_trait::async_trait;

use crate::domains::intent::Intent;
use crate::error::Result;

/// Remote fallback used when no local pattern recognises an utterance.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// `Ok(None)` means the provider answered but produced nothing usable.
    async fn classify(&self, input: &str) -> Result<Option<Intent>>;
}
