//! Flat JSON shapes served by the field-definition endpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::claim_type::ClaimTypeSummary;
use crate::spec::field::FieldDefinition;

/// One field definition exactly as the endpoint serializes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDefinitionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label_en: Option<String>,
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_options: Option<Vec<FieldOptionWire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogicWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOptionWire {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalLogicWire {
    pub depends_on: String,
    pub condition: String,
    #[serde(default)]
    pub value: Value,
}

/// Envelope returned by `GET /api/claim-types/{id}/fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldsResponse {
    pub success: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<ClaimTypeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Envelope returned by `GET /api/claim-types`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimTypesResponse {
    pub success: bool,
    #[serde(default)]
    pub claim_types: Vec<ClaimTypeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON schema describing a single field definition on the wire.
pub fn field_definition_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(FieldDefinitionWire)).unwrap_or(Value::Null)
}
