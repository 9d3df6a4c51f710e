use thiserror::Error;

/// Errors raised while turning a field-definition payload into typed definitions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    #[error("field '{field}' has unsupported field_type '{field_type}'")]
    UnknownFieldType { field: String, field_type: String },
    #[error("field '{field}' uses unknown condition '{condition}'")]
    UnknownCondition { field: String, condition: String },
    #[error("field '{field}' has an invalid comparand for '{condition}': {reason}")]
    InvalidComparand {
        field: String,
        condition: String,
        reason: String,
    },
    #[error("field '{field}' has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },
    #[error("field_name must not be empty")]
    EmptyFieldName,
    #[error("duplicate field_name '{0}' in definition set")]
    DuplicateField(String),
    #[error("no field named '{0}' is rendered")]
    UnknownField(String),
    #[error("field '{0}' is hidden and cannot take a value")]
    HiddenField(String),
    #[error("built-in catalog is malformed: {0}")]
    Catalog(String),
}
