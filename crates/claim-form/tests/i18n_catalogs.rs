use std::collections::BTreeMap;
use std::path::Path;

fn read_catalog(path: &Path) -> BTreeMap<String, String> {
    let raw = std::fs::read_to_string(path).expect("read locale file");
    serde_json::from_str(&raw).expect("parse locale file")
}

#[test]
fn crate_catalogs_match_root_catalogs() {
    let crate_i18n = Path::new(env!("CARGO_MANIFEST_DIR")).join("i18n");
    let root_i18n = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join("i18n");
    for locale in ["en.json", "ar.json"] {
        assert_eq!(
            read_catalog(&crate_i18n.join(locale)),
            read_catalog(&root_i18n.join(locale)),
            "crate and root {locale} diverged"
        );
    }
}

#[test]
fn arabic_catalog_covers_every_english_key() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("i18n");
    let en = read_catalog(&dir.join("en.json"));
    let ar = read_catalog(&dir.join("ar.json"));
    let missing = en
        .keys()
        .filter(|key| !ar.contains_key(*key))
        .collect::<Vec<_>>();
    assert!(missing.is_empty(), "missing ar keys: {missing:?}");
}

#[test]
fn help_literals_have_catalog_entries() {
    let en = read_catalog(&Path::new(env!("CARGO_MANIFEST_DIR")).join("i18n/en.json"));
    let required = [
        "cli.about",
        "cli.arg.claim_type",
        "cli.arg.config",
        "cli.arg.endpoint",
        "cli.arg.json",
        "cli.arg.locale",
        "cli.arg.source",
        "cli.arg.values",
        "cli.cmd.check",
        "cli.cmd.claim_types",
        "cli.cmd.fields",
        "cli.help",
        "cli.version",
    ];
    for key in required {
        assert!(en.contains_key(key), "missing i18n key {key}");
    }
}
