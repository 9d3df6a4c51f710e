use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use claim_form::spec::{FieldKind, Locale};
use claim_form::{
    ConfigError, DynamicFormEngine, EngineConfig, FieldDefinitionSource, HttpFieldSource,
    LoadOutcome, SourceError,
};
use serde_json::{Value, json};

async fn claim_types() -> Json<Value> {
    Json(json!({
        "success": true,
        "claim_types": [
            {"id": 1, "name_ar": "تأمين السيارات", "name_en": "Car Insurance", "code": "car",
             "icon": "fas fa-car", "color": "#dc3545"},
            {"id": 2, "name_ar": "التأمين الطبي", "name_en": "Health Insurance", "code": "health"}
        ]
    }))
}

async fn fields(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "1" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "claim_type": {"id": 1, "name_ar": "تأمين السيارات", "code": "car"},
                "fields": [
                    {"id": 11, "field_name": "license_plate", "field_label_en": "License Plate",
                     "field_type": "text", "required": true, "field_order": 2},
                    {"id": 10, "field_name": "vehicle_year", "field_label_en": "Year",
                     "field_type": "number", "min_value": 1990, "max_value": 2025,
                     "required": true, "field_order": 1}
                ]
            })),
        ),
        "disabled" => (
            StatusCode::OK,
            Json(json!({"success": false, "error": "claim type disabled"})),
        ),
        "slider" => (
            StatusCode::OK,
            Json(json!({"success": true, "fields": [
                {"field_name": "x", "field_type": "slider"}
            ]})),
        ),
        "car insurance" => (
            StatusCode::OK,
            Json(json!({"success": true, "fields": [
                {"field_name": "echo", "field_type": "text", "field_label": id}
            ]})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "نوع المطالبة غير موجود"})),
        ),
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"success": true, "claim_types": []}))
}

async fn crash() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    addr
}

async fn fixture_source() -> HttpFieldSource {
    let app = Router::new()
        .route("/api/claim-types", get(claim_types))
        .route("/api/claim-types/:id/fields", get(fields));
    let addr = serve(app).await;
    HttpFieldSource::new(EngineConfig::default().with_endpoint(format!("http://{addr}")))
        .expect("source builds")
}

#[tokio::test]
async fn lists_claim_types_with_numeric_ids() {
    let source = fixture_source().await;
    let listing = source.claim_types().await.expect("listing");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id, "1");
    assert_eq!(listing[0].display_name(Locale::Ar), "تأمين السيارات");
    assert_eq!(listing[1].code.as_deref(), Some("health"));
}

#[tokio::test]
async fn fetches_and_renders_fields() {
    let source = fixture_source().await;
    let set = source.fetch_fields("1").await.expect("fields");
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.claim_type.as_ref().and_then(|summary| summary.code.as_deref()),
        Some("car")
    );

    let mut engine = DynamicFormEngine::new(Locale::En);
    assert!(engine.load_fields(&source, Some("1")).await.is_applied());
    let form = engine.form().expect("rendered");
    assert_eq!(form.field_names(), vec!["vehicle_year", "license_plate"]);
    assert!(matches!(
        form.block("vehicle_year").map(|b| &b.definition.kind),
        Some(FieldKind::Number(_))
    ));
}

#[tokio::test]
async fn success_false_is_rejected() {
    let source = fixture_source().await;
    let err = source.fetch_fields("disabled").await.expect_err("rejected");
    assert!(matches!(err, SourceError::Rejected(Some(ref reason)) if reason == "claim type disabled"));
}

#[tokio::test]
async fn not_found_envelope_carries_server_error() {
    let source = fixture_source().await;
    let err = source.fetch_fields("99").await.expect_err("missing");
    assert!(matches!(err, SourceError::Rejected(Some(ref reason)) if reason == "نوع المطالبة غير موجود"));

    let mut engine = DynamicFormEngine::new(Locale::En);
    assert!(matches!(
        engine.load_fields(&source, Some("99")).await,
        LoadOutcome::Failed(_)
    ));
    assert_eq!(engine.target().control_count(), 0);
}

#[tokio::test]
async fn unknown_field_type_fails_decoding() {
    let source = fixture_source().await;
    let err = source.fetch_fields("slider").await.expect_err("rejected");
    assert!(matches!(err, SourceError::Decode { .. }), "{err}");
    assert!(err.to_string().contains("slider"), "{err}");
}

#[tokio::test]
async fn claim_type_is_sent_as_a_single_path_segment() {
    let source = fixture_source().await;
    let set = source.fetch_fields("car insurance").await.expect("fields");
    assert_eq!(set.fields()[0].label.text.as_deref(), Some("car insurance"));
}

#[tokio::test]
async fn dot_segment_claim_types_never_reach_another_endpoint() {
    let source = fixture_source().await;
    for id in [".", ".."] {
        let err = source.fetch_fields(id).await.expect_err("rejected");
        assert!(
            matches!(err, SourceError::Config(ConfigError::InvalidClaimType(_))),
            "{err}"
        );
    }
}

#[tokio::test]
async fn non_json_failures_report_the_status() {
    let addr = serve(Router::new().route("/api/claim-types", get(crash))).await;
    let source =
        HttpFieldSource::new(EngineConfig::default().with_endpoint(format!("http://{addr}")))
            .expect("source builds");
    let err = source.claim_types().await.expect_err("server error");
    assert!(matches!(err, SourceError::Status { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn configured_timeout_bounds_the_request() {
    let addr = serve(Router::new().route("/api/claim-types", get(slow))).await;
    let config = EngineConfig {
        request_timeout_secs: Some(1),
        ..EngineConfig::default().with_endpoint(format!("http://{addr}"))
    };
    let source = HttpFieldSource::new(config).expect("source builds");
    let err = source.claim_types().await.expect_err("times out");
    assert!(matches!(err, SourceError::Transport { .. }), "{err}");
}

#[test]
fn missing_endpoint_is_a_config_error() {
    let err = HttpFieldSource::new(EngineConfig::default()).expect_err("no endpoint");
    assert!(matches!(err, SourceError::Config(_)));
}
