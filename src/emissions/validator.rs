//! Range checks for estimation requests.

use super::request::{CalculationMode, CalculationRequest};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const TOKEN_COUNT_RANGE: RangeInclusive<u64> = 1..=5_000_000_000;
pub const CONTEXT_LENGTH_RANGE: RangeInclusive<u64> = 1_000..=500_000;
pub const MIN_CONTEXT_WINDOW: u64 = 100;
pub const CUSTOM_PUE_RANGE: RangeInclusive<f64> = 1.0..=3.0;
pub const CUSTOM_CARBON_INTENSITY_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Wire name of the offending field
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of [`validate`]: every violated rule, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    is_valid: bool,
    errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Plain messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(ValidationIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

/// Check every rule and collect all violations; never stops at the first one.
///
/// Flat mode checks the token count and context window; breakdown mode checks the
/// four channels instead. Context length and the PUE/carbon overrides are checked
/// in both modes.
pub fn validate(request: &CalculationRequest) -> ValidationReport {
    let mut issues = Issues(Vec::new());
    let mode = request.mode();

    match mode {
        CalculationMode::Flat => match request.token_count {
            Some(n) if TOKEN_COUNT_RANGE.contains(&n) => {}
            Some(n) => issues.push(
                "tokenCount",
                format!("token count must be between 1 and 5,000,000,000 (got {})", n),
            ),
            None => issues.push("tokenCount", "token count is required"),
        },
        CalculationMode::Breakdown => {
            let fields = request.breakdown.fields();
            for (name, value) in fields {
                if let Some(v) = value.filter(|v| *v < 0) {
                    issues.push(name, format!("must be >= 0 (got {})", v));
                }
            }
            if !fields.iter().any(|(_, v)| v.map_or(false, |v| v > 0)) {
                issues.push(
                    "tokenBreakdown",
                    "at least one token field must be greater than zero",
                );
            }
        }
    }

    let context_length = request.model.context_length();
    if !CONTEXT_LENGTH_RANGE.contains(&context_length) {
        issues.push(
            "contextLength",
            format!(
                "context length must be between 1,000 and 500,000 (got {})",
                context_length
            ),
        );
    }

    if mode == CalculationMode::Flat {
        let window = request.context_window;
        if window < MIN_CONTEXT_WINDOW {
            issues.push(
                "contextWindow",
                format!("context window must be at least 100 (got {})", window),
            );
        } else if window > context_length {
            issues.push(
                "contextWindow",
                format!(
                    "context window {} exceeds the model's context length {}",
                    window, context_length
                ),
            );
        }
    }

    if let Some(pue) = request.custom_pue {
        if !CUSTOM_PUE_RANGE.contains(&pue) {
            issues.push(
                "customPue",
                format!("PUE must be between 1.0 and 3.0 (got {})", pue),
            );
        }
    }

    if let Some(ci) = request.custom_carbon_intensity {
        if !CUSTOM_CARBON_INTENSITY_RANGE.contains(&ci) {
            issues.push(
                "customCarbonIntensity",
                format!("carbon intensity must be between 0.0 and 1.0 kg/kWh (got {})", ci),
            );
        }
    }

    ValidationReport::from_issues(issues.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emissions::TokenBreakdown;
    use crate::profiles::{DataCenterProfile, HardwareProfile, ModelProfile};

    fn request(tokens: u64, window: u64, context_length: u64) -> CalculationRequest {
        CalculationRequest::flat(
            tokens,
            window,
            HardwareProfile::new("hw", 400.0, 1400.0).unwrap(),
            DataCenterProfile::new("dc", 1.1, 0.2).unwrap(),
            ModelProfile::new("m", context_length, 1.0).unwrap(),
        )
    }

    #[test]
    fn test_valid_flat_request() {
        let report = validate(&request(1000, 2048, 8192));
        assert!(report.is_valid(), "{:?}", report.messages());
    }

    #[test]
    fn test_token_count_bounds() {
        assert!(!validate(&request(0, 2048, 8192)).is_valid());
        assert!(validate(&request(5_000_000_000, 2048, 8192)).is_valid());
        assert!(!validate(&request(5_000_000_001, 2048, 8192)).is_valid());
    }

    #[test]
    fn test_missing_token_count() {
        let mut req = request(1, 2048, 8192);
        req.token_count = None;
        let report = validate(&req);
        assert_eq!(report.errors()[0].field, "tokenCount");
    }

    #[test]
    fn test_window_cannot_exceed_context_length() {
        let report = validate(&request(1000, 8193, 8192));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "contextWindow");
        assert!(validate(&request(1000, 8192, 8192)).is_valid());
    }

    #[test]
    fn test_window_lower_bound() {
        let report = validate(&request(1000, 99, 8192));
        assert_eq!(report.errors().len(), 1);
        assert!(validate(&request(1000, 100, 8192)).is_valid());
    }

    #[test]
    fn test_context_length_bounds() {
        assert!(!validate(&request(1000, 100, 999)).is_valid());
        assert!(!validate(&request(1000, 2048, 500_001)).is_valid());
        assert!(validate(&request(1000, 2048, 500_000)).is_valid());
    }

    #[test]
    fn test_override_bounds() {
        let ok = request(1000, 2048, 8192)
            .with_custom_pue(3.0)
            .with_custom_carbon_intensity(0.0);
        assert!(validate(&ok).is_valid());

        let bad = request(1000, 2048, 8192)
            .with_custom_pue(0.9)
            .with_custom_carbon_intensity(1.01);
        assert_eq!(validate(&bad).errors().len(), 2);

        let nan = request(1000, 2048, 8192).with_custom_pue(f64::NAN);
        assert!(!validate(&nan).is_valid());
    }

    #[test]
    fn test_breakdown_all_zero_rejected() {
        let mut req = request(1, 2048, 8192);
        req.breakdown = TokenBreakdown::new(0, 0, 0, 0);
        let report = validate(&req);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "tokenBreakdown");
    }

    #[test]
    fn test_breakdown_negative_field() {
        let mut req = request(1, 2048, 8192);
        req.breakdown = TokenBreakdown {
            input_without_cache: Some(-5),
            output_tokens: Some(10),
            ..Default::default()
        };
        let report = validate(&req);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "inputWithoutCache");
    }

    #[test]
    fn test_breakdown_ignores_window_and_token_count() {
        let mut req = request(0, 150_000, 8192);
        req.breakdown = TokenBreakdown {
            cache_read: Some(500),
            ..Default::default()
        };
        assert!(validate(&req).is_valid());
    }

    #[test]
    fn test_report_serialization() {
        let report = validate(&request(0, 2048, 8192));
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["isValid"], false);
        assert_eq!(v["errors"][0]["field"], "tokenCount");
    }
}
