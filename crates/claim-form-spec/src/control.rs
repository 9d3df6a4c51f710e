use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::FieldKind;

/// Live state of a rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlValue {
    /// text, number, date, select, textarea and single-file inputs
    Single(String),
    /// radio group: the checked option
    Checked(Option<String>),
    /// checkbox group: every checked option
    CheckedSet(Vec<String>),
    /// file input with `multiple`
    Files(Vec<String>),
}

/// Value of a `depends_on` control as read by conditional rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyValue<'a> {
    Scalar(&'a str),
    List(&'a [String]),
}

impl DependencyValue<'_> {
    /// Lists compare as their comma-joined text.
    pub fn joined(&self) -> String {
        match self {
            DependencyValue::Scalar(value) => (*value).to_string(),
            DependencyValue::List(values) => values.join(","),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        let text = self.joined();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl ControlValue {
    pub fn empty_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Radio(_) => ControlValue::Checked(None),
            FieldKind::Checkbox(_) => ControlValue::CheckedSet(Vec::new()),
            FieldKind::File(file) if file.multiple => ControlValue::Files(Vec::new()),
            _ => ControlValue::Single(String::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ControlValue::Single(value) => value.trim().is_empty(),
            ControlValue::Checked(value) => value.is_none(),
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => values.is_empty(),
        }
    }

    /// Empties the control and reports whether anything was discarded.
    pub fn clear(&mut self) -> bool {
        let changed = match self {
            ControlValue::Single(value) => !value.is_empty(),
            ControlValue::Checked(value) => value.is_some(),
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => !values.is_empty(),
        };
        match self {
            ControlValue::Single(value) => value.clear(),
            ControlValue::Checked(value) => *value = None,
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => values.clear(),
        }
        changed
    }

    pub fn dependency_value(&self) -> DependencyValue<'_> {
        match self {
            ControlValue::Single(value) => DependencyValue::Scalar(value),
            ControlValue::Checked(value) => DependencyValue::Scalar(value.as_deref().unwrap_or("")),
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => {
                DependencyValue::List(values)
            }
        }
    }

    pub fn to_field_value(&self) -> FieldValue {
        match self {
            ControlValue::Single(value) => FieldValue::Single(value.clone()),
            ControlValue::Checked(value) => FieldValue::Single(value.clone().unwrap_or_default()),
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => {
                FieldValue::Multiple(values.clone())
            }
        }
    }

    /// Writes `value` into the control using the control's own shape.
    ///
    /// Lists written into single-value controls are comma-joined; an empty
    /// radio value unchecks the group.
    pub fn assign(&mut self, value: &FieldValue) {
        match self {
            ControlValue::Single(current) => *current = value.joined(),
            ControlValue::Checked(current) => {
                let text = value.joined();
                *current = if text.is_empty() { None } else { Some(text) };
            }
            ControlValue::CheckedSet(current) | ControlValue::Files(current) => {
                *current = value
                    .as_list()
                    .into_iter()
                    .filter(|item| !item.is_empty())
                    .collect();
            }
        }
    }

    /// `name=value` entries contributed to a native form submission.
    pub fn submission_values(&self) -> Vec<String> {
        match self {
            ControlValue::Single(value) => vec![value.clone()],
            ControlValue::Checked(value) => value.iter().cloned().collect(),
            ControlValue::CheckedSet(values) | ControlValue::Files(values) => values.clone(),
        }
    }
}

/// Snapshot value of one dynamic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    pub fn joined(&self) -> String {
        match self {
            FieldValue::Single(value) => value.clone(),
            FieldValue::Multiple(values) => values.join(","),
        }
    }

    pub fn as_list(&self) -> Vec<String> {
        match self {
            FieldValue::Single(value) => vec![value.clone()],
            FieldValue::Multiple(values) => values.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(value) => value.trim().is_empty(),
            FieldValue::Multiple(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multiple(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Mapping field_name -> value collected from (or written into) the dynamic controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field_name.into(), value.into());
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.0.get(field_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only the entries worth persisting as dynamic claim data.
    pub fn non_empty(&self) -> FormData {
        FormData(
            self.0
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for FormData {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        FormData(iter.into_iter().collect())
    }
}

/// Native serialization of the dynamic controls: ordered `name=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub pairs: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}
