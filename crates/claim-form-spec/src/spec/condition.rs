use serde_json::Value;

use crate::control::DependencyValue;
use crate::error::SpecError;

/// Comparison applied to the current value of the `depends_on` control.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    GreaterThan(f64),
    LessThan(f64),
}

/// Visibility rule tying one field to another field's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalLogic {
    pub depends_on: String,
    pub condition: Condition,
}

impl ConditionalLogic {
    pub fn new(depends_on: impl Into<String>, condition: Condition) -> Self {
        Self {
            depends_on: depends_on.into(),
            condition,
        }
    }

    pub fn holds(&self, dependency: &DependencyValue<'_>) -> bool {
        self.condition.holds(dependency)
    }
}

impl Condition {
    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Equals(_) => "equals",
            Condition::NotEquals(_) => "not_equals",
            Condition::In(_) => "in",
            Condition::NotIn(_) => "not_in",
            Condition::GreaterThan(_) => "greater_than",
            Condition::LessThan(_) => "less_than",
        }
    }

    /// Builds a typed condition from its wire operator and comparand.
    ///
    /// `owner` is the field carrying the rule and only feeds error messages.
    pub fn parse(owner: &str, operator: &str, comparand: &Value) -> Result<Self, SpecError> {
        let invalid = |reason: &str| SpecError::InvalidComparand {
            field: owner.to_string(),
            condition: operator.to_string(),
            reason: reason.to_string(),
        };

        match operator {
            "equals" => scalar_text(comparand)
                .map(Condition::Equals)
                .ok_or_else(|| invalid("expected a scalar value")),
            "not_equals" => scalar_text(comparand)
                .map(Condition::NotEquals)
                .ok_or_else(|| invalid("expected a scalar value")),
            "in" => text_set(comparand)
                .map(Condition::In)
                .ok_or_else(|| invalid("expected a list of scalar values")),
            "not_in" => text_set(comparand)
                .map(Condition::NotIn)
                .ok_or_else(|| invalid("expected a list of scalar values")),
            "greater_than" => numeric(comparand)
                .map(Condition::GreaterThan)
                .ok_or_else(|| invalid("expected a number")),
            "less_than" => numeric(comparand)
                .map(Condition::LessThan)
                .ok_or_else(|| invalid("expected a number")),
            other => Err(SpecError::UnknownCondition {
                field: owner.to_string(),
                condition: other.to_string(),
            }),
        }
    }

    /// Comparand in its wire form.
    pub fn comparand(&self) -> Value {
        match self {
            Condition::Equals(text) | Condition::NotEquals(text) => Value::String(text.clone()),
            Condition::In(set) | Condition::NotIn(set) => {
                Value::Array(set.iter().cloned().map(Value::String).collect())
            }
            Condition::GreaterThan(bound) | Condition::LessThan(bound) => {
                serde_json::Number::from_f64(*bound)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
    }

    pub fn holds(&self, dependency: &DependencyValue<'_>) -> bool {
        match self {
            Condition::Equals(target) => dependency.joined() == *target,
            Condition::NotEquals(target) => dependency.joined() != *target,
            Condition::In(set) => contained_in(dependency, set),
            Condition::NotIn(set) => !contained_in(dependency, set),
            Condition::GreaterThan(bound) => dependency.as_number().is_some_and(|v| v > *bound),
            Condition::LessThan(bound) => dependency.as_number().is_some_and(|v| v < *bound),
        }
    }
}

fn contained_in(dependency: &DependencyValue<'_>, set: &[String]) -> bool {
    match dependency {
        DependencyValue::Scalar(value) => set.iter().any(|item| item == value),
        DependencyValue::List(values) => values.iter().any(|value| set.contains(value)),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral floats drop their fraction so `1.0` compares equal to a control value of `1`.
fn number_text(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float.is_finite() => float.to_string(),
        _ => number.to_string(),
    }
}

fn text_set(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null | Value::Array(_) | Value::Object(_) => None,
                scalar => scalar_text(scalar),
            })
            .collect(),
        Value::Null | Value::Object(_) => None,
        scalar => scalar_text(scalar).map(|text| vec![text]),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}
