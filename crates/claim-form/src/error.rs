use std::path::PathBuf;

use claim_form_spec::SpecError;
use thiserror::Error;

/// Failures while fetching field definitions or claim types.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("server reported failure: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
    #[error(transparent)]
    Invalid(#[from] SpecError),
    #[error("unknown claim type '{0}'")]
    UnknownClaimType(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while loading or applying [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no endpoint configured; set `endpoint`, CLAIM_FORM_ENDPOINT or --endpoint")]
    MissingEndpoint,
    #[error("invalid endpoint url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("claim type '{0}' cannot be used as a path segment")]
    InvalidClaimType(String),
    #[error("unsupported locale '{0}'")]
    InvalidLocale(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
