//! Estimation inputs and outputs.

use super::weights::{TokenBreakdown, TokenWeights};
use crate::profiles::{DataCenterProfile, HardwareProfile, ModelProfile};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the effective token count is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// A single `token_count`, scaled by the context window.
    Flat,
    /// Four weighted channels; no context-window scaling.
    Breakdown,
}

/// A fully resolved estimation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub token_count: Option<u64>,
    pub breakdown: TokenBreakdown,
    /// Forces breakdown mode even when every channel is absent.
    pub use_detailed_tokens: bool,
    /// Takes precedence over the model's own weights.
    pub weights_override: Option<TokenWeights>,
    /// Only consulted in flat mode.
    pub context_window: u64,
    pub custom_pue: Option<f64>,
    pub custom_carbon_intensity: Option<f64>,
    pub hardware: HardwareProfile,
    pub data_center: DataCenterProfile,
    pub model: ModelProfile,
}

impl CalculationRequest {
    pub fn flat(
        token_count: u64,
        context_window: u64,
        hardware: HardwareProfile,
        data_center: DataCenterProfile,
        model: ModelProfile,
    ) -> Self {
        Self {
            token_count: Some(token_count),
            breakdown: TokenBreakdown::default(),
            use_detailed_tokens: false,
            weights_override: None,
            context_window,
            custom_pue: None,
            custom_carbon_intensity: None,
            hardware,
            data_center,
            model,
        }
    }

    pub fn detailed(
        breakdown: TokenBreakdown,
        context_window: u64,
        hardware: HardwareProfile,
        data_center: DataCenterProfile,
        model: ModelProfile,
    ) -> Self {
        Self {
            token_count: None,
            breakdown,
            use_detailed_tokens: true,
            weights_override: None,
            context_window,
            custom_pue: None,
            custom_carbon_intensity: None,
            hardware,
            data_center,
            model,
        }
    }

    pub fn with_custom_pue(mut self, pue: f64) -> Self {
        self.custom_pue = Some(pue);
        self
    }

    pub fn with_custom_carbon_intensity(mut self, intensity: f64) -> Self {
        self.custom_carbon_intensity = Some(intensity);
        self
    }

    pub fn with_weights_override(mut self, weights: TokenWeights) -> Self {
        self.weights_override = Some(weights);
        self
    }

    pub fn with_context_window(mut self, window: u64) -> Self {
        self.context_window = window;
        self
    }

    /// Breakdown mode when any channel is present or detailed tokens were requested.
    /// A flat count next to an empty breakdown stays flat.
    pub fn mode(&self) -> CalculationMode {
        if self.use_detailed_tokens || self.breakdown.has_any_field() {
            CalculationMode::Breakdown
        } else {
            CalculationMode::Flat
        }
    }

    pub fn effective_pue(&self) -> f64 {
        self.custom_pue.unwrap_or_else(|| self.data_center.pue())
    }

    pub fn effective_carbon_intensity(&self) -> f64 {
        self.custom_carbon_intensity
            .unwrap_or_else(|| self.data_center.carbon_intensity())
    }
}

/// Energy and carbon figures for one request. Serialized in the dashboard's camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Total over all effective tokens.
    pub energy_joules: f64,
    #[serde(rename = "energyKWh")]
    pub energy_kwh: f64,
    /// Grams CO2 for a single token. Kept under its historical wire name.
    #[serde(rename = "carbonEmissionsGrams")]
    pub carbon_emissions_per_token_grams: f64,
    pub total_emissions_grams: f64,
    pub lightbulb_minutes: f64,
    pub car_miles: f64,
    pub tree_hours: f64,
    /// Effective count from the breakdown; absent in flat mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_tokens: Option<f64>,
}
