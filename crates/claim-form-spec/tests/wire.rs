use claim_form_spec::{
    Condition, FieldDefinition, FieldKind, FieldSet, FieldsResponse, Locale, SpecError,
};
use serde_json::json;

const VEHICLE: &str = include_str!("fixtures/vehicle_fields.json");

fn parse(value: serde_json::Value) -> Result<FieldDefinition, String> {
    serde_json::from_value::<FieldDefinition>(value).map_err(|err| err.to_string())
}

#[test]
fn parses_vehicle_envelope_into_field_set() {
    let response: FieldsResponse = serde_json::from_str(VEHICLE).expect("fixture parses");
    assert!(response.success);
    let set = FieldSet::try_from(response).expect("unique names");
    assert_eq!(set.len(), 8);

    let claim_type = set.claim_type.as_ref().expect("claim type summary");
    assert_eq!(claim_type.id, "1");
    assert!(claim_type.matches("car"));
    assert_eq!(claim_type.display_name(Locale::En), "تأمين السيارات");

    let amount = &set.fields()[0];
    assert_eq!(amount.field_name, "damage_amount");
    assert_eq!(amount.label.resolve(Locale::Ar), Some("قيمة الضرر"));
    let FieldKind::Number(bounds) = &amount.kind else {
        panic!("expected a number field, got {:?}", amount.kind);
    };
    assert_eq!(bounds.min_value, Some(0.0));
    assert_eq!(bounds.max_value, Some(100000.0));
}

#[test]
fn field_type_is_matched_case_insensitively() {
    let field = parse(json!({"field_name": "notes", "field_type": "TextArea"})).expect("parses");
    assert_eq!(field.kind.type_name(), "textarea");
    assert_eq!(field.field_order, 0);
    assert!(!field.required);
}

#[test]
fn unknown_field_type_fails_the_load() {
    let err = parse(json!({"field_name": "x", "field_type": "slider"})).expect_err("rejected");
    assert!(err.contains("unsupported field_type 'slider'"), "{err}");
}

#[test]
fn unknown_condition_fails_fast() {
    let err = parse(json!({
        "field_name": "x",
        "field_type": "text",
        "conditional_logic": {"depends_on": "y", "condition": "contains", "value": "a"}
    }))
    .expect_err("rejected");
    assert!(err.contains("unknown condition 'contains'"), "{err}");
}

#[test]
fn invalid_pattern_is_rejected_at_load() {
    let err = parse(json!({"field_name": "x", "field_type": "text", "pattern": "(["}))
        .expect_err("rejected");
    assert!(err.contains("invalid pattern"), "{err}");
}

#[test]
fn empty_field_name_is_rejected() {
    let err = parse(json!({"field_name": "  ", "field_type": "text"})).expect_err("rejected");
    assert!(err.contains("field_name must not be empty"), "{err}");
}

#[test]
fn comparands_are_typed_per_operator() {
    let field = parse(json!({
        "field_name": "x",
        "field_type": "text",
        "conditional_logic": {"depends_on": "n", "condition": "greater_than", "value": "10"}
    }))
    .expect("numeric string accepted");
    let rule = field.conditional_logic.expect("rule");
    assert_eq!(rule.condition, Condition::GreaterThan(10.0));

    let field = parse(json!({
        "field_name": "x",
        "field_type": "text",
        "conditional_logic": {"depends_on": "n", "condition": "in", "value": ["a", 2]}
    }))
    .expect("mixed scalars accepted");
    assert_eq!(
        field.conditional_logic.expect("rule").condition,
        Condition::In(vec!["a".into(), "2".into()])
    );

    let err = parse(json!({
        "field_name": "x",
        "field_type": "text",
        "conditional_logic": {"depends_on": "n", "condition": "less_than", "value": "many"}
    }))
    .expect_err("non-numeric comparand rejected");
    assert!(err.contains("expected a number"), "{err}");
}

#[test]
fn duplicate_names_are_rejected_by_field_set() {
    let fields = vec![
        FieldDefinition::new("a", FieldKind::Date),
        FieldDefinition::new("a", FieldKind::Date),
    ];
    assert_eq!(
        FieldSet::new(fields),
        Err(SpecError::DuplicateField("a".into()))
    );
}

#[test]
fn definitions_serialize_back_to_the_flat_wire_shape() {
    let response: FieldsResponse = serde_json::from_str(VEHICLE).expect("fixture parses");
    let plate = response
        .fields
        .iter()
        .find(|field| field.field_name == "vehicle_plate")
        .expect("plate field");
    let value = serde_json::to_value(plate).expect("serializes");
    assert_eq!(value["field_type"], "text");
    assert_eq!(value["pattern"], "^[A-Z0-9 ]+$");
    assert_eq!(value["max_length"], 10);

    let reparsed: FieldDefinition = serde_json::from_value(value).expect("reparses");
    assert_eq!(&reparsed, plate);
}

#[test]
fn failure_envelope_carries_the_error() {
    let response: FieldsResponse =
        serde_json::from_value(json!({"success": false, "error": "نوع المطالبة غير موجود"}))
            .expect("parses");
    assert!(!response.success);
    assert!(response.fields.is_empty());
    assert_eq!(response.error.as_deref(), Some("نوع المطالبة غير موجود"));
}

#[test]
fn wire_schema_describes_field_definitions() {
    let schema = claim_form_spec::spec::field_definition_schema();
    let properties = schema["properties"].as_object().expect("object schema");
    assert!(properties.contains_key("field_name"));
    assert!(properties.contains_key("conditional_logic"));
    let required = schema["required"].as_array().expect("required list");
    assert!(required.iter().any(|name| name == "field_type"));
}
