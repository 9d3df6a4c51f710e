//! Built-in claim-type catalog used when no field-definition server is available.

use serde::Deserialize;

use crate::{
    error::SpecError,
    spec::{ClaimTypeSummary, FieldDefinition, FieldSet},
};

const BUILTIN: &str = include_str!("../catalog/claim_types.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "claim_type")]
    pub summary: ClaimTypeSummary,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalog {
    claim_types: Vec<CatalogEntry>,
}

impl Catalog {
    /// Car, health, home and travel claim types with their seeded fields.
    pub fn builtin() -> Result<Self, SpecError> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(raw: &str) -> Result<Self, SpecError> {
        let catalog: Catalog =
            serde_json::from_str(raw).map_err(|err| SpecError::Catalog(err.to_string()))?;
        for entry in &catalog.claim_types {
            FieldSet::new(entry.fields.clone())?;
        }
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.claim_types
    }

    pub fn claim_types(&self) -> Vec<ClaimTypeSummary> {
        self.claim_types
            .iter()
            .map(|entry| entry.summary.clone())
            .collect()
    }

    /// Looks a claim type up by id or code.
    pub fn entry(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.claim_types
            .iter()
            .find(|entry| entry.summary.matches(identifier))
    }

    pub fn field_set(&self, identifier: &str) -> Option<Result<FieldSet, SpecError>> {
        let entry = self.entry(identifier)?;
        Some(
            FieldSet::new(entry.fields.clone())
                .map(|set| set.with_claim_type(Some(entry.summary.clone()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        let codes = catalog
            .claim_types()
            .into_iter()
            .filter_map(|summary| summary.code)
            .collect::<Vec<_>>();
        assert_eq!(codes, ["car", "health", "home", "travel"]);
    }

    #[test]
    fn lookup_accepts_id_or_code() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        let by_code = catalog.entry("home").expect("home entry");
        let by_id = catalog.entry("3").expect("id 3");
        assert_eq!(by_code, by_id);
        assert!(catalog.entry("boat").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let raw = r#"{"claim_types":[{"claim_type":{"id":1},"fields":[
            {"field_name":"a","field_type":"text"},
            {"field_name":"a","field_type":"number"}]}]}"#;
        assert_eq!(
            Catalog::from_json(raw),
            Err(SpecError::DuplicateField("a".into()))
        );
    }
}
