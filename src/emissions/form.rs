//! Edge adapter: caller-shaped form data with profile ids, resolved before estimation.

use super::estimator::estimate;
use super::request::{CalculationRequest, CalculationResult};
use super::weights::{TokenBreakdown, TokenWeights};
use crate::profiles::{DataCenterProfile, HardwareProfile, ModelProfile, ProfileLookup, ProfileRef};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Calculation input as submitted by the dashboard or CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationForm {
    pub hardware: ProfileRef<HardwareProfile>,
    pub data_center: ProfileRef<DataCenterProfile>,
    pub model: ProfileRef<ModelProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
    #[serde(flatten)]
    pub breakdown: TokenBreakdown,
    #[serde(default)]
    pub use_detailed_tokens: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_weights: Option<TokenWeights>,
    /// Defaults to the model's context window, then its context length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_carbon_intensity: Option<f64>,
}

impl CalculationForm {
    pub fn new(
        hardware: impl Into<ProfileRef<HardwareProfile>>,
        data_center: impl Into<ProfileRef<DataCenterProfile>>,
        model: impl Into<ProfileRef<ModelProfile>>,
    ) -> Self {
        Self {
            hardware: hardware.into(),
            data_center: data_center.into(),
            model: model.into(),
            token_count: None,
            breakdown: TokenBreakdown::default(),
            use_detailed_tokens: false,
            token_weights: None,
            context_window: None,
            custom_pue: None,
            custom_carbon_intensity: None,
        }
    }

    /// Form referring to catalog entries by id.
    pub fn by_ids(hardware: &str, data_center: &str, model: &str) -> Self {
        Self::new(
            ProfileRef::<HardwareProfile>::id(hardware),
            ProfileRef::<DataCenterProfile>::id(data_center),
            ProfileRef::<ModelProfile>::id(model),
        )
    }

    /// Resolve every profile reference. Fails on the first unknown id.
    pub fn resolve(self, lookup: &dyn ProfileLookup) -> Result<CalculationRequest> {
        let hardware = self.hardware.resolve(lookup)?;
        let data_center = self.data_center.resolve(lookup)?;
        let model = self.model.resolve(lookup)?;
        let context_window = self
            .context_window
            .unwrap_or_else(|| model.default_context_window());
        Ok(CalculationRequest {
            token_count: self.token_count,
            breakdown: self.breakdown,
            use_detailed_tokens: self.use_detailed_tokens,
            weights_override: self.token_weights,
            context_window,
            custom_pue: self.custom_pue,
            custom_carbon_intensity: self.custom_carbon_intensity,
            hardware,
            data_center,
            model,
        })
    }
}

/// Resolve ids through `lookup`, then [`estimate`].
pub fn calculate_from_form_data(
    form: CalculationForm,
    lookup: &dyn ProfileLookup,
) -> Result<CalculationResult> {
    let request = form.resolve(lookup)?;
    Ok(estimate(&request))
}

fn json_schema_from_type<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

/// JSON Schema of [`CalculationForm`].
pub fn request_schema() -> serde_json::Value {
    json_schema_from_type::<CalculationForm>()
}

/// JSON Schema of [`CalculationResult`].
pub fn result_schema() -> serde_json::Value {
    json_schema_from_type::<CalculationResult>()
}
