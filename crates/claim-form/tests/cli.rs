#![cfg(feature = "cli")]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn claim_form() -> Command {
    let mut cmd = Command::cargo_bin("claim-form").expect("binary builds");
    cmd.env_remove("CLAIM_FORM_ENDPOINT")
        .env_remove("CLAIM_FORM_LOCALE")
        .env("LC_ALL", "en_US.UTF-8");
    cmd
}

#[test]
fn lists_builtin_claim_types() {
    claim_form()
        .args(["claim-types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Claim types:"))
        .stdout(predicate::str::contains("[1] Car Insurance (car)"))
        .stdout(predicate::str::contains("[4] Travel Insurance (travel)"));
}

#[test]
fn lists_claim_types_in_arabic() {
    claim_form()
        .args(["--locale", "ar", "claim-types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("أنواع المطالبات:"))
        .stdout(predicate::str::contains("تأمين السفر"));
}

#[test]
fn renders_fields_as_json() {
    let output = claim_form()
        .args(["fields", "health", "--json"])
        .output()
        .expect("run claim-form");
    assert!(output.status.success());
    let view: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(view["state"], "fields");
    assert_eq!(view["fields"][0]["name"], "hospital_name");
    let surgery = view["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .find(|field| field["name"] == "surgery_details")
        .expect("surgery field");
    assert_eq!(surgery["visible"], false);
    assert_eq!(surgery["depends_on"], "treatment_type");
}

#[test]
fn renders_fields_as_text() {
    claim_form()
        .args(["fields", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fields for home:"))
        .stdout(predicate::str::contains(
            "Damage Type (damage_type) [select] [required]",
        ))
        .stdout(predicate::str::contains("fire | water | theft"));
}

#[test]
fn unknown_claim_type_fails() {
    claim_form()
        .args(["fields", "boat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load claim type boat"));
}

#[test]
fn check_passes_and_drops_hidden_values() {
    let output = claim_form()
        .args(["check", "car", "--json", "--values"])
        .arg(fixture("car_values.json"))
        .output()
        .expect("run claim-form");
    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(report["valid"], true);
    assert_eq!(report["data"]["vehicle_make"], "Toyota");
    assert!(report["data"].get("injury_details").is_none());
    assert!(
        report["payload"]
            .as_str()
            .expect("payload")
            .contains("license_plate=ABC+1234")
    );
}

#[test]
fn check_blocks_invalid_values() {
    claim_form()
        .args(["check", "car", "--values"])
        .arg(fixture("car_values_invalid.json"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Submission blocked: 2 field(s)"))
        .stdout(predicate::str::contains("vehicle_model: This field is required"))
        .stdout(predicate::str::contains("vehicle_year: Value must be at least 1990"))
        .stdout(predicate::str::contains("injury_details:").not());
}

#[test]
fn check_reports_unreadable_values_file() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let path = temp.path().join("values.json");
    std::fs::write(&path, "not json").expect("write values");
    claim_form()
        .args(["check", "car", "--values"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read values file"));
}

#[test]
fn config_endpoint_selects_http_source() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let path = temp.path().join("claim-form.toml");
    std::fs::write(&path, "endpoint = \"not a url\"\n").expect("write config");
    claim_form()
        .args(["claim-types", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid endpoint url"));
}
