use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Prompt cannot be empty")]
    EmptyPrompt,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {status}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("No image URL found in response")]
    NoImageUrl,
    #[error("Failed to write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Input error: {0}")]
    Input(#[from] io::Error),
}

impl GeneratorError {
    /// Response text returned by the server alongside a failing status, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            GeneratorError::HttpStatus { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
