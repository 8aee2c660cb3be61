//! # Emission Estimation Module
//!
//! Converts token usage into energy (joules / kWh) and carbon (grams CO2).
//!
//! ## Overview
//!
//! An estimate needs an effective token count and three profiles:
//!
//! | Input | Contributes |
//! |-------|-------------|
//! | [`HardwareProfile`](crate::profiles::HardwareProfile) | kWh per token from power / throughput |
//! | [`ModelProfile`](crate::profiles::ModelProfile) | complexity factor, token weights |
//! | [`DataCenterProfile`](crate::profiles::DataCenterProfile) | PUE, grid carbon intensity |
//!
//! The effective count is either a flat `token_count` or a weighted sum of four
//! token channels ([`TokenBreakdown`]). The two modes differ in one place: flat
//! counts are scaled by `(context_window / 2048)²`, breakdowns are not (see
//! [`ContextScaling`]).
//!
//! ## Example
//!
//! ```rust
//! use ai_carbon_rust::emissions::{estimate, validate, CalculationRequest};
//! use ai_carbon_rust::profiles::{DataCenterProfile, HardwareProfile, ModelProfile};
//!
//! # fn main() -> ai_carbon_rust::Result<()> {
//! let request = CalculationRequest::flat(
//!     1000,
//!     1250,
//!     HardwareProfile::new("nvidia-a100", 400.0, 1400.0)?,
//!     DataCenterProfile::new("us-west", 1.1, 0.2)?,
//!     ModelProfile::new("gpt-4", 128_000, 1.6)?,
//! );
//! assert!(validate(&request).is_valid());
//! let result = estimate(&request);
//! println!("{:.3} g CO2", result.total_emissions_grams);
//! # Ok(())
//! # }
//! ```
//!
//! Validation is a separate step; [`estimate`] trusts its input.

mod estimator;
mod form;
mod request;
mod validator;
mod weights;

pub use estimator::{
    estimate, kwh_per_token, ContextScaling, CAR_MILES_PER_KG_CO2, JOULES_PER_KWH, LIGHTBULB_KW,
    REFERENCE_CONTEXT_WINDOW, TREE_GRAMS_PER_HOUR,
};
pub use form::{calculate_from_form_data, request_schema, result_schema, CalculationForm};
pub use request::{CalculationMode, CalculationRequest, CalculationResult};
pub use validator::{
    validate, ValidationIssue, ValidationReport, CONTEXT_LENGTH_RANGE,
    CUSTOM_CARBON_INTENSITY_RANGE, CUSTOM_PUE_RANGE, MIN_CONTEXT_WINDOW, TOKEN_COUNT_RANGE,
};
pub use weights::{weighted_tokens, TokenBreakdown, TokenWeights, DEFAULT_TOKEN_WEIGHTS};
