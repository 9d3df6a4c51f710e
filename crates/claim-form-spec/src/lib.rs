#![allow(missing_docs)]

pub mod catalog;
pub mod control;
pub mod error;
pub mod i18n;
pub mod render;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use catalog::{Catalog, CatalogEntry};
pub use control::{ControlValue, DependencyValue, FieldValue, FormData, FormSubmission};
pub use error::SpecError;
pub use i18n::{Locale, LocalizedText, message, message_with};
pub use render::{
    FieldBlock, RenderTarget, RenderedForm, Visibility, render_fields, render_json, render_text,
};
pub use spec::{
    ClaimTypeSummary, ClaimTypesResponse, Condition, ConditionalLogic, FieldDefinition, FieldKind,
    FieldOption, FieldSet, FieldsResponse, FileOptions, NumberConstraints, TextConstraints,
};
pub use validate::{FieldError, ValidationResult, Violation, validate_all};
pub use visibility::{evaluate_all, evaluate_rule};
