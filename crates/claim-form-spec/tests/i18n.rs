use claim_form_spec::i18n::catalog_keys;
use claim_form_spec::{Locale, LocalizedText, message, message_with};

#[test]
fn locales_share_the_same_keys() {
    assert_eq!(catalog_keys(Locale::En), catalog_keys(Locale::Ar));
    assert!(!catalog_keys(Locale::En).is_empty());
}

#[test]
fn messages_interpolate_and_fall_back_to_key() {
    assert_eq!(
        message_with(Locale::En, "validation.max_length", &[("max", "10".into())]),
        "Must be at most 10 characters"
    );
    assert_eq!(message(Locale::Ar, "no.such.key"), "no.such.key");
}

#[test]
fn localized_text_ignores_blank_variants() {
    let text = LocalizedText::new(None, Some("  ".into()), Some("Plate".into()));
    assert_eq!(text.resolve(Locale::Ar), Some("Plate"));
    assert!(LocalizedText::new(None, None, Some(String::new())).is_empty());
}
