use regex::Regex;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    control::ControlValue,
    i18n::{Locale, message_with},
    render::RenderedForm,
    spec::{FieldDefinition, FieldKind, FieldOption},
};

/// Kind of constraint a field value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    Required,
    NotANumber,
    #[serde(rename = "min_value")]
    BelowMinimum,
    #[serde(rename = "max_value")]
    AboveMaximum,
    #[serde(rename = "min_length")]
    TooShort,
    #[serde(rename = "max_length")]
    TooLong,
    PatternMismatch,
    InvalidDate,
    UnknownOption,
}

impl Violation {
    pub fn code(&self) -> &'static str {
        match self {
            Violation::Required => "required",
            Violation::NotANumber => "not_a_number",
            Violation::BelowMinimum => "min_value",
            Violation::AboveMaximum => "max_value",
            Violation::TooShort => "min_length",
            Violation::TooLong => "max_length",
            Violation::PatternMismatch => "pattern_mismatch",
            Violation::InvalidDate => "invalid_date",
            Violation::UnknownOption => "unknown_option",
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            Violation::Required => "validation.required",
            Violation::NotANumber => "validation.number",
            Violation::BelowMinimum => "validation.min_value",
            Violation::AboveMaximum => "validation.max_value",
            Violation::TooShort => "validation.min_length",
            Violation::TooLong => "validation.max_length",
            Violation::PatternMismatch => "validation.pattern",
            Violation::InvalidDate => "validation.date",
            Violation::UnknownOption => "validation.option",
        }
    }
}

/// Inline error annotation attached to a field block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_name: String,
    #[serde(rename = "code")]
    pub violation: Violation,
    pub message: String,
}

/// Outcome of validating every visible field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

type Args = Vec<(&'static str, String)>;

/// Validates every visible field, annotating each block with its error.
///
/// Hidden fields are skipped. Violations are accumulated across fields; each
/// field reports its first violation.
pub fn validate_all(form: &mut RenderedForm, locale: Locale) -> ValidationResult {
    let mut errors = Vec::new();

    for block in form.blocks_mut() {
        block.error = None;
        if !block.is_visible() {
            continue;
        }

        let violation = if block.value.is_empty() {
            block.definition.required.then(|| (Violation::Required, Vec::new()))
        } else {
            check_value(&block.definition, &block.value)
        };

        if let Some((violation, args)) = violation {
            let error = FieldError {
                field_name: block.definition.field_name.clone(),
                violation,
                message: message_with(locale, violation.message_key(), &args),
            };
            tracing::debug!(
                field = %error.field_name,
                code = violation.code(),
                "field failed validation"
            );
            block.error = Some(error.clone());
            errors.push(error);
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_value(definition: &FieldDefinition, value: &ControlValue) -> Option<(Violation, Args)> {
    let text = value.to_field_value().joined();
    match &definition.kind {
        FieldKind::Text(constraints) | FieldKind::Textarea(constraints) => {
            let length = text.chars().count();
            if let Some(min) = constraints.min_length
                && length < min
            {
                return Some((Violation::TooShort, vec![("min", min.to_string())]));
            }
            if let Some(max) = constraints.max_length
                && length > max
            {
                return Some((Violation::TooLong, vec![("max", max.to_string())]));
            }
            // whole-value match, as the native `pattern` attribute does
            if let Some(pattern) = &constraints.pattern
                && let Ok(regex) = Regex::new(&format!("^(?:{pattern})$"))
                && !regex.is_match(&text)
            {
                return Some((Violation::PatternMismatch, Vec::new()));
            }
            None
        }
        FieldKind::Number(bounds) => {
            let Some(number) = text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
            else {
                return Some((Violation::NotANumber, Vec::new()));
            };
            if let Some(min) = bounds.min_value
                && number < min
            {
                return Some((Violation::BelowMinimum, vec![("min", min.to_string())]));
            }
            if let Some(max) = bounds.max_value
                && number > max
            {
                return Some((Violation::AboveMaximum, vec![("max", max.to_string())]));
            }
            None
        }
        FieldKind::Date => {
            let format = format_description!("[year]-[month]-[day]");
            match Date::parse(text.trim(), format) {
                Ok(_) => None,
                Err(_) => Some((Violation::InvalidDate, Vec::new())),
            }
        }
        FieldKind::Select(options) | FieldKind::Radio(options) => {
            (!is_declared(options, &text)).then(|| (Violation::UnknownOption, Vec::new()))
        }
        FieldKind::Checkbox(options) => {
            let selected = value.to_field_value().as_list();
            selected
                .iter()
                .any(|item| !is_declared(options, item))
                .then(|| (Violation::UnknownOption, Vec::new()))
        }
        FieldKind::File(_) => None,
    }
}

/// An empty option list accepts any value.
fn is_declared(options: &[FieldOption], value: &str) -> bool {
    options.is_empty() || options.iter().any(|option| option.value == value)
}
