//! Error taxonomy shared across the crate.
//!
//! Port implementations return [`ProviderError`]; the core converts those
//! into result values before they reach an entry adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration problems. These are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingCredential(&'static str),

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Failures talking to the content source or the text generator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Client not configured for posting. Provide a bot username and password.")]
    NoAuth,
}

/// Why a generation attempt produced no usable text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Generator(#[from] ProviderError),

    #[error("Generated comment too short ({length} < {minimum} characters)")]
    TooShort { length: usize, minimum: usize },
}
