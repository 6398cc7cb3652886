//! Shared error type for the workspace

use thiserror::Error;

/// Top-level error for the assistant
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Retrieval error: {0}")]
    Rag(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across crates
pub type Result<T> = std::result::Result<T, Error>;
