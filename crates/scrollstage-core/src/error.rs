use thiserror::Error;

use crate::section::SectionId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck parsing error: {0}")]
    Deck(String),

    #[error("Deck has no sections")]
    EmptyDeck,

    #[error("Sections cannot be registered after the container is mounted")]
    AlreadyMounted,

    #[error("Section not found: {0}")]
    UnknownSection(SectionId),
}

pub type Result<T> = std::result::Result<T, Error>;
