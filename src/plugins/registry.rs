use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::interfaces::plugins::{Plugin, PluginKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: PluginKind,
    pub description: String,
    pub configured: bool,
}

/// Capability table. Filled once while wiring the brain and read-only afterwards.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<PluginKind, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Refuses a second plugin for a kind that is already taken.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> bool {
        let kind = plugin.kind();
        if self.plugins.contains_key(&kind) {
            warn!(plugin = %kind, "plugin already registered");
            return false;
        }
        self.plugins.insert(kind, plugin);
        true
    }

    pub fn with(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.register(plugin);
        self
    }

    pub fn get(&self, kind: PluginKind) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugins in routing order.
    pub fn list(&self) -> Vec<PluginInfo> {
        PluginKind::ALL
            .into_iter()
            .filter_map(|kind| self.plugins.get(&kind))
            .map(|plugin| PluginInfo {
                name: plugin.kind(),
                description: plugin.description().to_string(),
                configured: plugin.is_configured(),
            })
            .collect()
    }
}
