pub mod brain;
pub mod config;
pub mod domains;
pub mod error;
pub mod factories;
pub mod interfaces;
pub mod logging;
pub mod plugins;
pub mod providers;

pub use brain::LexiBrain;
pub use domains::intent::{Intent, Parameters};
pub use domains::response::{BrainResponse, PluginData, PluginResult, ResultType};

pub type Result<T> = std::result::Result<T, error::LexiError>;
