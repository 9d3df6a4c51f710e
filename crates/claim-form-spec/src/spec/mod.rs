pub mod claim_type;
pub mod condition;
pub mod field;
pub mod wire;

use std::collections::BTreeSet;

pub use claim_type::ClaimTypeSummary;
pub use condition::{Condition, ConditionalLogic};
pub use field::{
    FieldDefinition, FieldKind, FieldOption, FileOptions, NumberConstraints, TextConstraints,
};
pub use wire::{ClaimTypesResponse, FieldsResponse, field_definition_schema};

use crate::error::SpecError;

/// The definition set of one claim type, with unique field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    pub claim_type: Option<ClaimTypeSummary>,
    fields: Vec<FieldDefinition>,
}

impl FieldSet {
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, SpecError> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.field_name.as_str()) {
                return Err(SpecError::DuplicateField(field.field_name.clone()));
            }
        }
        Ok(Self {
            claim_type: None,
            fields,
        })
    }

    pub fn with_claim_type(mut self, claim_type: Option<ClaimTypeSummary>) -> Self {
        self.claim_type = claim_type;
        self
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldDefinition> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<FieldsResponse> for FieldSet {
    type Error = SpecError;

    fn try_from(response: FieldsResponse) -> Result<Self, Self::Error> {
        Ok(FieldSet::new(response.fields)?.with_claim_type(response.claim_type))
    }
}
