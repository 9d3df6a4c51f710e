use async_trait::async_trait;
use claim_form_spec::{Catalog, ClaimTypeSummary, ClaimTypesResponse, FieldSet, FieldsResponse};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::EngineConfig;
use crate::error::{ConfigError, SourceError};

/// Supplies the field-definition set of a claim type.
#[async_trait]
pub trait FieldDefinitionSource: Send + Sync {
    async fn fetch_fields(&self, claim_type: &str) -> Result<FieldSet, SourceError>;

    async fn claim_types(&self) -> Result<Vec<ClaimTypeSummary>, SourceError>;
}

/// Field-definition endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFieldSource {
    client: reqwest::Client,
    config: EngineConfig,
}

impl HttpFieldSource {
    pub fn new(config: EngineConfig) -> Result<Self, SourceError> {
        // fail early on a missing or malformed endpoint
        config.claim_types_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        tracing::debug!(%url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !status.is_success() {
            // the fields endpoint reports a missing claim type as 404 with a JSON error body
            if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&body)
                && envelope.success == Some(false)
            {
                return Err(SourceError::Rejected(envelope.error));
            }
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    success: Option<bool>,
    error: Option<String>,
}

#[async_trait]
impl FieldDefinitionSource for HttpFieldSource {
    async fn fetch_fields(&self, claim_type: &str) -> Result<FieldSet, SourceError> {
        let url = self.config.fields_url(claim_type)?;
        let response: FieldsResponse = self.get_json(url).await?;
        if !response.success {
            return Err(SourceError::Rejected(response.error));
        }
        Ok(FieldSet::try_from(response)?)
    }

    async fn claim_types(&self) -> Result<Vec<ClaimTypeSummary>, SourceError> {
        let url = self.config.claim_types_url()?;
        let response: ClaimTypesResponse = self.get_json(url).await?;
        if !response.success {
            return Err(SourceError::Rejected(response.error));
        }
        Ok(response.claim_types)
    }
}

/// In-memory catalog, used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFieldSource {
    catalog: Catalog,
}

impl StaticFieldSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// The car, health, home and travel claim types.
    pub fn builtin() -> Result<Self, SourceError> {
        Ok(Self::new(Catalog::builtin()?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl FieldDefinitionSource for StaticFieldSource {
    async fn fetch_fields(&self, claim_type: &str) -> Result<FieldSet, SourceError> {
        match self.catalog.field_set(claim_type) {
            Some(set) => Ok(set?),
            None => Err(SourceError::UnknownClaimType(claim_type.to_string())),
        }
    }

    async fn claim_types(&self) -> Result<Vec<ClaimTypeSummary>, SourceError> {
        Ok(self.catalog.claim_types())
    }
}
