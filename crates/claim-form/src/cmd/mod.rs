pub mod check;
pub mod claim_types;
pub mod fields;
pub mod i18n;

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use claim_form_spec::{Locale, message};
use clap::ValueEnum;

use crate::config::EngineConfig;
use crate::engine::{DynamicFormEngine, LoadOutcome};
use crate::error::ConfigError;
use crate::source::{FieldDefinitionSource, HttpFieldSource, StaticFieldSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Embedded car, health, home and travel catalog
    Builtin,
    /// Claims server at the configured endpoint
    Http,
}

/// Resolved settings shared by every subcommand.
pub struct Context {
    pub locale: Locale,
    pub kind: SourceKind,
    pub source: Box<dyn FieldDefinitionSource>,
}

impl Context {
    /// Config file, then environment, then flags. Without an explicit
    /// `--source` the HTTP source is used whenever an endpoint is known.
    pub fn build(
        kind: Option<SourceKind>,
        endpoint: Option<&str>,
        config_path: Option<&Path>,
        locale: Option<&str>,
    ) -> Result<Self> {
        let config = resolve_config(endpoint, config_path, locale)
            .map_err(|err| anyhow!(i18n::tr_with("cli.error.config", &[("error", err.to_string())])))?;

        let kind = kind.unwrap_or(if config.endpoint.is_some() {
            SourceKind::Http
        } else {
            SourceKind::Builtin
        });
        let source: Box<dyn FieldDefinitionSource> = match kind {
            SourceKind::Builtin => Box::new(StaticFieldSource::builtin()?),
            SourceKind::Http => Box::new(HttpFieldSource::new(config.clone())?),
        };
        tracing::debug!(?kind, locale = %config.locale, "cli context ready");
        Ok(Self {
            locale: config.locale,
            kind,
            source,
        })
    }
}

fn resolve_config(
    endpoint: Option<&str>,
    config_path: Option<&Path>,
    locale: Option<&str>,
) -> Result<EngineConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig {
            locale: i18n::form_locale(),
            ..EngineConfig::default()
        },
    }
    .apply_env()?;
    if let Some(endpoint) = endpoint {
        config.endpoint = Some(endpoint.to_string());
    }
    if let Some(raw) = locale {
        config.locale = raw
            .parse()
            .map_err(|_| ConfigError::InvalidLocale(raw.to_string()))?;
    }
    Ok(config)
}

/// Loads `claim_type` into a fresh engine, failing with a localized message.
pub(crate) async fn load_engine(ctx: &Context, claim_type: &str) -> Result<DynamicFormEngine> {
    let mut engine = DynamicFormEngine::new(ctx.locale);
    match engine
        .load_fields(ctx.source.as_ref(), Some(claim_type))
        .await
    {
        LoadOutcome::Applied { .. } => Ok(engine),
        LoadOutcome::Failed(err) => bail!(i18n::tr_with(
            "cli.error.load",
            &[
                ("claim_type", claim_type.to_string()),
                ("error", err.to_string()),
            ],
        )),
        LoadOutcome::Cleared | LoadOutcome::Superseded => {
            bail!(message(ctx.locale, "render.empty"))
        }
    }
}
