use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::i18n::LocalizedText;
use crate::spec::condition::{Condition, ConditionalLogic};
use crate::spec::wire::{ConditionalLogicWire, FieldDefinitionWire, FieldOptionWire};

/// Length and pattern constraints shared by `text` and `textarea`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

/// Inclusive bounds for `number` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberConstraints {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// One `{value, label}` choice of a select, radio or checkbox field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOption {
    pub value: String,
    pub label: LocalizedText,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: LocalizedText::plain(label),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOptions {
    pub multiple: bool,
    pub accept: Option<String>,
}

/// Control type of a field together with the constraints that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(TextConstraints),
    Number(NumberConstraints),
    Date,
    Select(Vec<FieldOption>),
    Textarea(TextConstraints),
    Radio(Vec<FieldOption>),
    Checkbox(Vec<FieldOption>),
    File(FileOptions),
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Number(_) => "number",
            FieldKind::Date => "date",
            FieldKind::Select(_) => "select",
            FieldKind::Textarea(_) => "textarea",
            FieldKind::Radio(_) => "radio",
            FieldKind::Checkbox(_) => "checkbox",
            FieldKind::File(_) => "file",
        }
    }

    pub fn options(&self) -> &[FieldOption] {
        match self {
            FieldKind::Select(options) | FieldKind::Radio(options) | FieldKind::Checkbox(options) => {
                options
            }
            _ => &[],
        }
    }

    pub fn text_constraints(&self) -> Option<&TextConstraints> {
        match self {
            FieldKind::Text(constraints) | FieldKind::Textarea(constraints) => Some(constraints),
            _ => None,
        }
    }
}

/// Server-supplied description of one dynamic form control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldDefinitionWire", into = "FieldDefinitionWire")]
pub struct FieldDefinition {
    pub id: Option<i64>,
    pub field_name: String,
    pub label: LocalizedText,
    pub placeholder: LocalizedText,
    pub help_text: LocalizedText,
    pub required: bool,
    pub field_order: i64,
    pub css_class: Option<String>,
    pub kind: FieldKind,
    pub conditional_logic: Option<ConditionalLogic>,
}

impl FieldDefinition {
    pub fn new(field_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: None,
            field_name: field_name.into(),
            label: LocalizedText::default(),
            placeholder: LocalizedText::default(),
            help_text: LocalizedText::default(),
            required: false,
            field_order: 0,
            css_class: None,
            kind,
            conditional_logic: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = LocalizedText::plain(label);
        self
    }

    pub fn with_order(mut self, field_order: i64) -> Self {
        self.field_order = field_order;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn visible_when(mut self, depends_on: impl Into<String>, condition: Condition) -> Self {
        self.conditional_logic = Some(ConditionalLogic::new(depends_on, condition));
        self
    }

    /// Native input attributes the control carries for its declared constraints.
    pub fn native_attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attrs = BTreeMap::new();
        if self.required {
            attrs.insert("required", "required".to_string());
        }
        match &self.kind {
            FieldKind::Text(text) | FieldKind::Textarea(text) => {
                if let Some(min) = text.min_length {
                    attrs.insert("minlength", min.to_string());
                }
                if let Some(max) = text.max_length {
                    attrs.insert("maxlength", max.to_string());
                }
                // textarea has no native pattern attribute
                if let (FieldKind::Text(_), Some(pattern)) = (&self.kind, &text.pattern) {
                    attrs.insert("pattern", pattern.clone());
                }
            }
            FieldKind::Number(bounds) => {
                if let Some(min) = bounds.min_value {
                    attrs.insert("min", min.to_string());
                }
                if let Some(max) = bounds.max_value {
                    attrs.insert("max", max.to_string());
                }
            }
            FieldKind::File(file) => {
                if file.multiple {
                    attrs.insert("multiple", "multiple".to_string());
                }
                if let Some(accept) = &file.accept {
                    attrs.insert("accept", accept.clone());
                }
            }
            FieldKind::Date
            | FieldKind::Select(_)
            | FieldKind::Radio(_)
            | FieldKind::Checkbox(_) => {}
        }
        attrs
    }
}

impl TryFrom<FieldDefinitionWire> for FieldDefinition {
    type Error = SpecError;

    fn try_from(wire: FieldDefinitionWire) -> Result<Self, Self::Error> {
        let field_name = wire.field_name.trim().to_string();
        if field_name.is_empty() {
            return Err(SpecError::EmptyFieldName);
        }

        let text_constraints = || -> Result<TextConstraints, SpecError> {
            if let Some(pattern) = &wire.pattern {
                Regex::new(pattern).map_err(|err| SpecError::InvalidPattern {
                    field: field_name.clone(),
                    reason: err.to_string(),
                })?;
            }
            Ok(TextConstraints {
                min_length: wire.min_length,
                max_length: wire.max_length,
                pattern: wire.pattern.clone().filter(|p| !p.is_empty()),
            })
        };
        let options = || -> Vec<FieldOption> {
            wire.field_options
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(|option| FieldOption {
                    value: option.value,
                    label: LocalizedText::new(option.label, option.label_ar, option.label_en),
                })
                .collect()
        };

        let kind = match wire.field_type.trim().to_ascii_lowercase().as_str() {
            "text" => FieldKind::Text(text_constraints()?),
            "textarea" => FieldKind::Textarea(text_constraints()?),
            "number" => FieldKind::Number(NumberConstraints {
                min_value: wire.min_value,
                max_value: wire.max_value,
            }),
            "date" => FieldKind::Date,
            "select" => FieldKind::Select(options()),
            "radio" => FieldKind::Radio(options()),
            "checkbox" => FieldKind::Checkbox(options()),
            "file" => FieldKind::File(FileOptions {
                multiple: wire.multiple.unwrap_or(false),
                accept: wire.accept.clone(),
            }),
            other => {
                return Err(SpecError::UnknownFieldType {
                    field: field_name,
                    field_type: other.to_string(),
                });
            }
        };

        let conditional_logic = wire
            .conditional_logic
            .map(|rule| {
                Condition::parse(&field_name, rule.condition.trim(), &rule.value)
                    .map(|condition| ConditionalLogic::new(rule.depends_on.trim(), condition))
            })
            .transpose()?;

        Ok(FieldDefinition {
            id: wire.id,
            label: LocalizedText::new(wire.field_label, wire.field_label_ar, wire.field_label_en),
            placeholder: LocalizedText::new(
                wire.placeholder,
                wire.placeholder_ar,
                wire.placeholder_en,
            ),
            help_text: LocalizedText::new(wire.help_text, wire.help_text_ar, wire.help_text_en),
            required: wire.required.unwrap_or(false),
            field_order: wire.field_order.unwrap_or(0),
            css_class: wire.css_class.filter(|class| !class.trim().is_empty()),
            field_name,
            kind,
            conditional_logic,
        })
    }
}

impl From<FieldDefinition> for FieldDefinitionWire {
    fn from(definition: FieldDefinition) -> Self {
        let mut wire = FieldDefinitionWire {
            id: definition.id,
            field_type: definition.kind.type_name().to_string(),
            field_label: definition.label.text,
            field_label_ar: definition.label.ar,
            field_label_en: definition.label.en,
            field_order: Some(definition.field_order),
            required: Some(definition.required),
            placeholder: definition.placeholder.text,
            placeholder_ar: definition.placeholder.ar,
            placeholder_en: definition.placeholder.en,
            help_text: definition.help_text.text,
            help_text_ar: definition.help_text.ar,
            help_text_en: definition.help_text.en,
            css_class: definition.css_class,
            conditional_logic: definition.conditional_logic.map(|rule| ConditionalLogicWire {
                depends_on: rule.depends_on,
                condition: rule.condition.operator().to_string(),
                value: rule.condition.comparand(),
            }),
            field_name: definition.field_name,
            ..FieldDefinitionWire::default()
        };

        match definition.kind {
            FieldKind::Text(text) | FieldKind::Textarea(text) => {
                wire.min_length = text.min_length;
                wire.max_length = text.max_length;
                wire.pattern = text.pattern;
            }
            FieldKind::Number(bounds) => {
                wire.min_value = bounds.min_value;
                wire.max_value = bounds.max_value;
            }
            FieldKind::Select(options) | FieldKind::Radio(options) | FieldKind::Checkbox(options) => {
                wire.field_options = Some(
                    options
                        .into_iter()
                        .map(|option| FieldOptionWire {
                            value: option.value,
                            label: option.label.text,
                            label_ar: option.label.ar,
                            label_en: option.label.en,
                        })
                        .collect(),
                );
            }
            FieldKind::File(file) => {
                wire.multiple = Some(file.multiple);
                wire.accept = file.accept;
            }
            FieldKind::Date => {}
        }
        wire
    }
}
