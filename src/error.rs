use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub use crate::Result;

impl From<serde_json::Error> for LexiError {
    fn from(err: serde_json::Error) -> Self {
        LexiError::Serialization(err.to_string())
    }
}
