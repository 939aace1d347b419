//! Validates generated cluster requests against the formal request
//! schema at schema/cluster-request.schema.json.

use std::path::Path;

use quickcluster_core::{WizardValues, KEY_EXPIRATION, KEY_NAME, KEY_PRODUCT, KEY_REGION};
use quickcluster_interchange::ClusterRequest;

fn validator() -> jsonschema::Validator {
    let schema_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/cluster-request.schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

#[test]
fn generated_request_matches_schema() {
    let values = WizardValues::new()
        .with(KEY_NAME, "demo")
        .with(KEY_REGION, 3)
        .with(KEY_PRODUCT, 7)
        .with(KEY_EXPIRATION, 2)
        .with("num_web_nodes", 5)
        .with("web_flavor", "small")
        .with("enable_monitoring", true)
        .with("zones", vec!["a", "b"]);
    let request = ClusterRequest::new("demo", 3, 7, "2026-10-19T12:00:00Z", &values);

    assert_eq!(request.product_params.len(), 4);
    assert!(!request.product_params.contains_key(KEY_NAME));

    let instance = request.to_json();
    if let Err(error) = validator().validate(&instance) {
        panic!(
            "request failed schema validation: {}\n{}",
            error,
            serde_json::to_string_pretty(&instance).unwrap()
        );
    }

    // serde and the hand-built JSON agree
    assert_eq!(serde_json::to_value(&request).unwrap(), instance);
}

#[test]
fn reserved_keys_in_params_are_rejected_by_schema() {
    let instance = serde_json::json!({
        "name": "demo",
        "region_id": 3,
        "product_id": 7,
        "reservation_expiration": "2026-10-19T12:00:00Z",
        "product_params": {"name": "sneaky"}
    });
    assert!(validator().validate(&instance).is_err());
}
