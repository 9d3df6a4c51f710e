use std::path::Path;
use std::time::Duration;

use claim_form_spec::Locale;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const ENDPOINT_ENV: &str = "CLAIM_FORM_ENDPOINT";
pub const LOCALE_ENV: &str = "CLAIM_FORM_LOCALE";

const CLAIM_TYPE_PLACEHOLDER: &str = "{claim_type}";

/// Characters escaped when a claim-type identifier is spliced into a path.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Where field definitions come from and how they are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub fields_path: String,
    pub claim_types_path: String,
    pub locale: Locale,
    /// Absent means requests may wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            fields_path: "/api/claim-types/{claim_type}/fields".to_string(),
            claim_types_path: "/api/claim-types".to_string(),
            locale: Locale::default(),
            request_timeout_secs: None,
        }
    }
}

impl EngineConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Applies `CLAIM_FORM_ENDPOINT` and `CLAIM_FORM_LOCALE` from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|value| !value.trim().is_empty()) {
            self.endpoint = Some(endpoint.trim().to_string());
        }
        if let Some(raw) = lookup(LOCALE_ENV).filter(|value| !value.trim().is_empty()) {
            self.locale = raw
                .parse()
                .map_err(|_| ConfigError::InvalidLocale(raw.clone()))?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn fields_url(&self, claim_type: &str) -> Result<Url, ConfigError> {
        // dot-segments would be collapsed by URL parsing
        if matches!(claim_type, "." | "..") {
            return Err(ConfigError::InvalidClaimType(claim_type.to_string()));
        }
        let segment = utf8_percent_encode(claim_type, PATH_SEGMENT).to_string();
        self.join(&self.fields_path.replace(CLAIM_TYPE_PLACEHOLDER, &segment))
    }

    pub fn claim_types_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.claim_types_path)
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ConfigError::MissingEndpoint)?;
        let raw = format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source })
    }
}
