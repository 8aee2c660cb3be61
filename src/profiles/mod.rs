//! Hardware, data-center and model descriptors consumed by the estimator.
//!
//! Profiles are immutable once built. Their physical invariants (positive power and
//! throughput, positive context length, non-negative carbon intensity) are checked
//! when a profile is constructed or deserialized, so the estimator never has to
//! guard its divisions.

mod catalog;
mod reference;

pub use catalog::{CatalogDocument, ProfileCatalog, ProfileLookup, SharedCatalog};
pub use reference::{CatalogEntry, ProfileRef};

use crate::emissions::TokenWeights;
use crate::error::ProfileKind;
use crate::tokens::TokenizerProfile;
use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn ensure_positive(kind: ProfileKind, id: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_profile(
            kind,
            id,
            format!("{} must be a finite number > 0 (got {})", field, value),
        ))
    }
}

fn ensure_non_negative(kind: ProfileKind, id: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_profile(
            kind,
            id,
            format!("{} must be a finite number >= 0 (got {})", field, value),
        ))
    }
}

/// Accelerator power draw and steady-state throughput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "RawHardwareProfile")]
pub struct HardwareProfile {
    id: String,
    power_watts: f64,
    tokens_per_second: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    efficiency: Option<f64>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawHardwareProfile {
    id: String,
    power_watts: f64,
    tokens_per_second: f64,
    #[serde(default)]
    efficiency: Option<f64>,
}

impl TryFrom<RawHardwareProfile> for HardwareProfile {
    type Error = Error;

    fn try_from(raw: RawHardwareProfile) -> Result<Self> {
        let profile = HardwareProfile::new(raw.id, raw.power_watts, raw.tokens_per_second)?;
        Ok(match raw.efficiency {
            Some(e) => profile.with_efficiency(e),
            None => profile,
        })
    }
}

impl HardwareProfile {
    pub fn new(id: impl Into<String>, power_watts: f64, tokens_per_second: f64) -> Result<Self> {
        let id = id.into();
        ensure_positive(ProfileKind::Hardware, &id, "powerWatts", power_watts)?;
        ensure_positive(ProfileKind::Hardware, &id, "tokensPerSecond", tokens_per_second)?;
        Ok(Self {
            id,
            power_watts,
            tokens_per_second,
            efficiency: None,
        })
    }

    /// Informational only; never enters the energy formula.
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn power_watts(&self) -> f64 {
        self.power_watts
    }
    pub fn tokens_per_second(&self) -> f64 {
        self.tokens_per_second
    }
    pub fn efficiency(&self) -> Option<f64> {
        self.efficiency
    }
}

/// Facility overhead and grid carbon intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "RawDataCenterProfile")]
pub struct DataCenterProfile {
    id: String,
    pue: f64,
    /// kg CO2 per kWh
    carbon_intensity: f64,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawDataCenterProfile {
    id: String,
    pue: f64,
    carbon_intensity: f64,
}

impl TryFrom<RawDataCenterProfile> for DataCenterProfile {
    type Error = Error;

    fn try_from(raw: RawDataCenterProfile) -> Result<Self> {
        DataCenterProfile::new(raw.id, raw.pue, raw.carbon_intensity)
    }
}

impl DataCenterProfile {
    /// PUE below 1.0 is physically meaningless but accepted here; the request
    /// validator bounds user overrides instead.
    pub fn new(id: impl Into<String>, pue: f64, carbon_intensity: f64) -> Result<Self> {
        let id = id.into();
        ensure_positive(ProfileKind::DataCenter, &id, "pue", pue)?;
        ensure_non_negative(ProfileKind::DataCenter, &id, "carbonIntensity", carbon_intensity)?;
        Ok(Self {
            id,
            pue,
            carbon_intensity,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn pue(&self) -> f64 {
        self.pue
    }
    pub fn carbon_intensity(&self) -> f64 {
        self.carbon_intensity
    }
}

/// Model capacity, relative compute cost and optional per-channel token weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "RawModelProfile")]
pub struct ModelProfile {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<u64>,
    context_length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context_window: Option<u64>,
    /// Energy per token relative to the GPT-3-scale reference (1.0).
    complexity_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_weights: Option<TokenWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tokenizer: Option<TokenizerProfile>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawModelProfile {
    id: String,
    #[serde(default)]
    parameters: Option<u64>,
    context_length: u64,
    #[serde(default)]
    context_window: Option<u64>,
    complexity_factor: f64,
    #[serde(default)]
    token_weights: Option<TokenWeights>,
    #[serde(default)]
    tokenizer: Option<TokenizerProfile>,
}

impl TryFrom<RawModelProfile> for ModelProfile {
    type Error = Error;

    fn try_from(raw: RawModelProfile) -> Result<Self> {
        let mut profile = ModelProfile::new(raw.id, raw.context_length, raw.complexity_factor)?;
        profile.parameters = raw.parameters;
        profile.context_window = raw.context_window;
        profile.tokenizer = raw.tokenizer;
        match raw.token_weights {
            Some(w) => profile.with_token_weights(w),
            None => Ok(profile),
        }
    }
}

impl ModelProfile {
    pub fn new(id: impl Into<String>, context_length: u64, complexity_factor: f64) -> Result<Self> {
        let id = id.into();
        if context_length == 0 {
            return Err(Error::invalid_profile(
                ProfileKind::Model,
                id,
                "contextLength must be > 0",
            ));
        }
        ensure_non_negative(ProfileKind::Model, &id, "complexityFactor", complexity_factor)?;
        Ok(Self {
            id,
            parameters: None,
            context_length,
            context_window: None,
            complexity_factor,
            token_weights: None,
            tokenizer: None,
        })
    }

    pub fn with_parameters(mut self, parameters: u64) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_context_window(mut self, window: u64) -> Self {
        self.context_window = Some(window);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerProfile) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_token_weights(mut self, weights: TokenWeights) -> Result<Self> {
        if let Err(reason) = weights.check() {
            return Err(Error::invalid_profile(ProfileKind::Model, self.id, reason));
        }
        self.token_weights = Some(weights);
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn parameters(&self) -> Option<u64> {
        self.parameters
    }
    pub fn context_length(&self) -> u64 {
        self.context_length
    }
    pub fn context_window(&self) -> Option<u64> {
        self.context_window
    }
    pub fn complexity_factor(&self) -> f64 {
        self.complexity_factor
    }
    pub fn token_weights(&self) -> Option<&TokenWeights> {
        self.token_weights.as_ref()
    }

    /// Tokenizer for counting this model's text; inferred from the id when unset.
    pub fn tokenizer(&self) -> TokenizerProfile {
        self.tokenizer
            .unwrap_or_else(|| TokenizerProfile::from_model_name(&self.id))
    }

    /// Window to use when a caller does not supply one.
    pub fn default_context_window(&self) -> u64 {
        self.context_window.unwrap_or(self.context_length)
    }
}
