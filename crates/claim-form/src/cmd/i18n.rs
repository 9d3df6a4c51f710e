use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::sync::OnceLock;

use claim_form_spec::Locale;
use unic_langid::LanguageIdentifier;

const SUPPORTED_LOCALES: &[&str] = &["ar", "en"];

static EN_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static AR_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static SELECTED_LOCALE: OnceLock<String> = OnceLock::new();
static EN_VALUE_TO_KEY: OnceLock<BTreeMap<String, String>> = OnceLock::new();

fn parse(raw: &str) -> BTreeMap<String, String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn en_messages() -> &'static BTreeMap<String, String> {
    EN_MESSAGES.get_or_init(|| parse(include_str!("../../i18n/en.json")))
}

fn ar_messages() -> &'static BTreeMap<String, String> {
    AR_MESSAGES.get_or_init(|| parse(include_str!("../../i18n/ar.json")))
}

fn en_value_to_key() -> &'static BTreeMap<String, String> {
    EN_VALUE_TO_KEY.get_or_init(|| {
        en_messages()
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect()
    })
}

fn detect_env_locale() -> Option<String> {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(val) = env::var(key) {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn detect_system_locale() -> Option<String> {
    sys_locale::get_locale()
}

fn normalize_locale(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, _)) = cleaned.split_once('.') {
        cleaned = head;
    }
    if let Some((head, _)) = cleaned.split_once('@') {
        cleaned = head;
    }
    let cleaned = cleaned.replace('_', "-");
    cleaned
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|lid| lid.language.as_str().to_ascii_lowercase())
}

pub(crate) fn resolve_supported_locale(candidate: &str) -> Option<String> {
    let language = normalize_locale(candidate)?;
    SUPPORTED_LOCALES
        .iter()
        .find(|supported| **supported == language)
        .map(|supported| supported.to_string())
}

fn select_locale(cli_locale: Option<&str>) -> String {
    if let Some(cli) = cli_locale
        && let Some(found) = resolve_supported_locale(cli)
    {
        return found;
    }
    if let Some(env_loc) = detect_env_locale()
        && let Some(found) = resolve_supported_locale(&env_loc)
    {
        return found;
    }
    if let Some(sys_loc) = detect_system_locale()
        && let Some(found) = resolve_supported_locale(&sys_loc)
    {
        return found;
    }
    "en".to_string()
}

pub fn init(cli_locale: Option<&str>) {
    let _ = SELECTED_LOCALE.set(select_locale(cli_locale));
}

pub fn cli_locale_from_argv(args: &[OsString]) -> Option<String> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let raw = arg.to_string_lossy();
        if raw == "--locale" {
            return iter.next().map(|value| value.to_string_lossy().to_string());
        }
        if let Some(rest) = raw.strip_prefix("--locale=") {
            return Some(rest.to_string());
        }
    }
    None
}

pub fn selected_locale() -> &'static str {
    SELECTED_LOCALE.get().map(String::as_str).unwrap_or("en")
}

/// The selected CLI locale as a form display locale.
pub fn form_locale() -> Locale {
    selected_locale().parse().unwrap_or_default()
}

pub fn tr_key(key: &str) -> String {
    let localized = match selected_locale() {
        "ar" => ar_messages().get(key),
        _ => None,
    };
    localized
        .or_else(|| en_messages().get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    let mut output = tr_key(key);
    for (name, value) in args {
        output = output.replace(&format!("{{{name}}}"), value);
    }
    output
}

pub fn tr_lit(english_literal: &str) -> String {
    let Some(key) = en_value_to_key().get(english_literal) else {
        return english_literal.to_string();
    };
    tr_key(key)
}
