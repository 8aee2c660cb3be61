//! Tests for request validation

use ai_carbon_rust::emissions::{validate, CalculationRequest, TokenBreakdown};
use ai_carbon_rust::profiles::{DataCenterProfile, HardwareProfile, ModelProfile};

fn request(tokens: u64, window: u64) -> CalculationRequest {
    CalculationRequest::flat(
        tokens,
        window,
        HardwareProfile::new("hw", 400.0, 1400.0).unwrap(),
        DataCenterProfile::new("dc", 1.2, 0.3).unwrap(),
        ModelProfile::new("gpt-4", 128_000, 1.6).unwrap(),
    )
}

#[test]
fn test_three_violations_yield_three_errors() {
    let req = request(0, 2048)
        .with_custom_pue(4.0)
        .with_custom_carbon_intensity(1.5);
    let report = validate(&req);
    assert!(!report.is_valid());
    assert_eq!(report.errors().len(), 3, "{:?}", report.messages());

    let fields: Vec<&str> = report.errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["tokenCount", "customPue", "customCarbonIntensity"]);
}

#[test]
fn test_every_rule_reported_together() {
    let mut req = request(6_000_000_000, 50)
        .with_custom_pue(0.5)
        .with_custom_carbon_intensity(-0.1);
    req.model = ModelProfile::new("tiny", 512, 1.0).unwrap();
    let report = validate(&req);
    // token count, context length, context window, PUE, carbon intensity
    assert_eq!(report.errors().len(), 5, "{:?}", report.messages());
}

#[test]
fn test_valid_request_has_no_errors() {
    let report = validate(&request(1_000, 4096).with_custom_pue(1.0));
    assert!(report.is_valid());
    assert!(report.errors().is_empty());
}

#[test]
fn test_all_zero_breakdown_rejected() {
    let mut req = request(1_000, 2048);
    req.breakdown = TokenBreakdown::new(0, 0, 0, 0);
    let report = validate(&req);
    assert!(!report.is_valid());
    assert_eq!(report.errors().len(), 1);
}

#[test]
fn test_detailed_flag_with_no_fields_rejected() {
    let mut req = request(1_000, 2048);
    req.use_detailed_tokens = true;
    let report = validate(&req);
    assert!(!report.is_valid());
    assert_eq!(report.errors()[0].field, "tokenBreakdown");
}

#[test]
fn test_breakdown_negative_fields_each_reported() {
    let mut req = request(1_000, 2048);
    req.breakdown = TokenBreakdown {
        input_with_cache: Some(-1),
        cache_read: Some(-2),
        output_tokens: Some(3),
        ..Default::default()
    };
    let report = validate(&req);
    assert_eq!(report.errors().len(), 2, "{:?}", report.messages());
}
