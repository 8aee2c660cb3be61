//! # ai-carbon-rust
//!
//! Emission estimation engine: turns AI token usage into energy and carbon estimates.
//!
//! ## Overview
//!
//! The crate is a set of pure, synchronous functions. It performs no I/O of its
//! own apart from optional catalog loading; hardware, data-center and model
//! profiles are injected by the caller through a [`profiles::ProfileLookup`].
//! Every entry point is safe to call concurrently.
//!
//! ## Key Features
//!
//! - **Estimation**: [`emissions::estimate`] with flat and weighted-breakdown modes
//! - **Validation**: [`emissions::validate`] collects every out-of-range input
//! - **Token counting**: [`tokens::count_tokens`] using real BPE vocabularies, with a
//!   character-count fallback that never fails
//! - **Cost**: [`tokens::calculate_cost`] from per-million-token pricing
//! - **Profiles**: YAML/JSON catalogs with invariant-checked deserialization
//!
//! ## Quick Start
//!
//! ```rust
//! use ai_carbon_rust::emissions::{calculate_from_form_data, CalculationForm};
//! use ai_carbon_rust::profiles::ProfileCatalog;
//!
//! # fn main() -> ai_carbon_rust::Result<()> {
//! let catalog = ProfileCatalog::builtin()?;
//! let mut form = CalculationForm::by_ids("nvidia-a100", "us-west", "gpt-4");
//! form.token_count = Some(10_000);
//! let result = calculate_from_form_data(form, &catalog)?;
//! println!("{:.4} kWh, {:.2} g CO2", result.energy_kwh, result.total_emissions_grams);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`emissions`] | Estimator, weighted tokens, validator, form adapter |
//! | [`profiles`] | Hardware / data-center / model profiles and catalogs |
//! | [`tokens`] | Token counting and cost estimation |
//! | [`format`] | Display helpers |

pub mod emissions;
pub mod format;
pub mod profiles;
pub mod tokens;

pub use emissions::{
    calculate_from_form_data, estimate, validate, weighted_tokens, CalculationForm,
    CalculationRequest, CalculationResult, TokenBreakdown, TokenWeights, ValidationReport,
    DEFAULT_TOKEN_WEIGHTS,
};
pub use format::{format_large_number, format_number};
pub use profiles::{DataCenterProfile, HardwareProfile, ModelProfile, ProfileRef};
pub use tokens::{calculate_cost, count_tokens, TokenizerProfile};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ProfileKind};
