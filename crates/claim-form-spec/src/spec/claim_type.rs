use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Claim-type metadata as listed by the claim-types endpoint.
///
/// The identifier is opaque; numeric ids from the server are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimTypeSummary {
    #[serde(deserialize_with = "opaque_id")]
    #[schemars(with = "String")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ClaimTypeSummary {
    pub fn matches(&self, identifier: &str) -> bool {
        self.id == identifier || self.code.as_deref() == Some(identifier)
    }

    pub fn display_name(&self, locale: crate::Locale) -> &str {
        let (preferred, other) = match locale {
            crate::Locale::Ar => (&self.name_ar, &self.name_en),
            crate::Locale::En => (&self.name_en, &self.name_ar),
        };
        preferred
            .as_deref()
            .or(other.as_deref())
            .or(self.code.as_deref())
            .unwrap_or(&self.id)
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(number) => number.to_string(),
        RawId::Text(text) => text,
    })
}
