//! Error types for the user directory client

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    StatusError { status: StatusCode, url: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Whether the remote side reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::NotFound(_) => true,
            ClientError::StatusError { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
