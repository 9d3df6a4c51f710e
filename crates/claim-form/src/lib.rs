#![allow(missing_docs)]

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod cmd;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;

pub use claim_form_spec as spec;
pub use config::EngineConfig;
pub use engine::{DynamicFormEngine, EngineState, LoadOutcome, LoadTicket, Submission};
pub use error::{ConfigError, SourceError};
pub use source::{FieldDefinitionSource, HttpFieldSource, StaticFieldSource};
