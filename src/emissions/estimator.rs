//! Energy and carbon estimation.

use super::request::{CalculationMode, CalculationRequest, CalculationResult};
use super::weights::weighted_tokens;

pub const JOULES_PER_KWH: f64 = 3_600_000.0;

/// GPT-3-scale context window the quadratic context penalty is measured against.
pub const REFERENCE_CONTEXT_WINDOW: f64 = 2048.0;

/// 10 W bulb, in kW.
pub const LIGHTBULB_KW: f64 = 0.01;
pub const CAR_MILES_PER_KG_CO2: f64 = 2.3;
/// CO2 absorbed by one tree in an hour.
pub const TREE_GRAMS_PER_HOUR: f64 = 0.022;

/// Whether the context window feeds into energy per token.
///
/// Flat counts scale with `(window / 2048)²`. Weighted breakdowns carry their
/// per-channel cost in the weights and are never scaled by the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextScaling {
    Quadratic,
    Skip,
}

impl ContextScaling {
    pub fn for_mode(mode: CalculationMode) -> Self {
        match mode {
            CalculationMode::Flat => ContextScaling::Quadratic,
            CalculationMode::Breakdown => ContextScaling::Skip,
        }
    }

    pub fn multiplier(self, context_window: u64) -> f64 {
        match self {
            ContextScaling::Quadratic => {
                (context_window as f64 / REFERENCE_CONTEXT_WINDOW).powi(2)
            }
            ContextScaling::Skip => 1.0,
        }
    }
}

/// Tokens that actually enter the energy formula, plus the weighted figure to echo back.
fn effective_tokens(request: &CalculationRequest, mode: CalculationMode) -> (f64, Option<f64>) {
    match mode {
        CalculationMode::Breakdown => {
            let weights = request
                .weights_override
                .as_ref()
                .or_else(|| request.model.token_weights());
            let weighted = weighted_tokens(&request.breakdown, weights);
            (weighted, Some(weighted))
        }
        CalculationMode::Flat => (request.token_count.unwrap_or(0) as f64, None),
    }
}

/// kWh to produce one token on this hardware/model/facility, before unit conversion.
pub fn kwh_per_token(request: &CalculationRequest, mode: CalculationMode) -> f64 {
    let hw = &request.hardware;
    let base = (hw.power_watts() / 1000.0) / hw.tokens_per_second();
    base * request.model.complexity_factor()
        * ContextScaling::for_mode(mode).multiplier(request.context_window)
        * request.effective_pue()
}

/// Estimate energy and carbon for a resolved request.
///
/// Performs no validation; run [`super::validate`] first when inputs are untrusted.
pub fn estimate(request: &CalculationRequest) -> CalculationResult {
    let mode = request.mode();
    let (effective, weighted) = effective_tokens(request, mode);

    let joules_per_token = kwh_per_token(request, mode) * JOULES_PER_KWH;
    let energy_joules = joules_per_token * effective;
    let energy_kwh = energy_joules / JOULES_PER_KWH;

    let kg_per_token = (joules_per_token / JOULES_PER_KWH) * request.effective_carbon_intensity();
    let grams_per_token = kg_per_token * 1000.0;
    let total_emissions_grams = grams_per_token * effective;

    tracing::debug!(
        ?mode,
        effective_tokens = effective,
        hardware = request.hardware.id(),
        data_center = request.data_center.id(),
        model = request.model.id(),
        energy_kwh,
        total_emissions_grams,
        "estimated emissions"
    );

    CalculationResult {
        energy_joules,
        energy_kwh,
        carbon_emissions_per_token_grams: grams_per_token,
        total_emissions_grams,
        lightbulb_minutes: energy_kwh / LIGHTBULB_KW,
        car_miles: (total_emissions_grams / 1000.0) * CAR_MILES_PER_KG_CO2,
        tree_hours: total_emissions_grams / TREE_GRAMS_PER_HOUR,
        weighted_tokens: weighted,
    }
}
