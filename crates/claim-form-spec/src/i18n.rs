use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static EN_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static AR_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();

/// Display locales supported by the claim forms.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    #[default]
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    fn other(self) -> Locale {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts bare languages and tagged forms such as `ar-SA`, `en_US.UTF-8`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let language = raw
            .trim()
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            _ => Err(format!("unsupported locale '{}'", raw.trim())),
        }
    }
}

/// Display text with an untranslated default and optional per-locale variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl LocalizedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn new(text: Option<String>, ar: Option<String>, en: Option<String>) -> Self {
        Self {
            text: non_blank(text),
            ar: non_blank(ar),
            en: non_blank(en),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.ar.is_none() && self.en.is_none()
    }

    /// Requested locale first, then the untranslated default, then the other locale.
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        self.variant(locale)
            .or(self.text.as_deref())
            .or_else(|| self.variant(locale.other()))
    }

    fn variant(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::Ar => self.ar.as_deref(),
            Locale::En => self.en.as_deref(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn catalog(locale: Locale) -> &'static BTreeMap<String, String> {
    match locale {
        Locale::En => EN_MESSAGES.get_or_init(|| parse_catalog(include_str!("../i18n/en.json"))),
        Locale::Ar => AR_MESSAGES.get_or_init(|| parse_catalog(include_str!("../i18n/ar.json"))),
    }
}

fn parse_catalog(raw: &str) -> BTreeMap<String, String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Looks up a message, falling back to English and then to the key itself.
pub fn message(locale: Locale, key: &str) -> String {
    catalog(locale)
        .get(key)
        .or_else(|| catalog(Locale::En).get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Looks up a message and substitutes `{name}` placeholders.
pub fn message_with(locale: Locale, key: &str, args: &[(&str, String)]) -> String {
    let mut output = message(locale, key);
    for (name, value) in args {
        output = output.replace(&format!("{{{}}}", name), value);
    }
    output
}

/// Every key present in the catalog of `locale`.
pub fn catalog_keys(locale: Locale) -> Vec<&'static str> {
    catalog(locale).keys().map(String::as_str).collect()
}
