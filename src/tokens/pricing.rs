//! Model pricing and cost estimation.

use super::counter::{count_tokens, TokenizerProfile};
use serde::{Deserialize, Serialize};

const PER_MILLION: f64 = 1_000_000.0;

/// Prices in `currency` per 1,000,000 tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub model: String,
    pub input_per_million: f64,
    pub output_per_million: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input_per_million: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl ModelPricing {
    pub fn new(model: &str, input: f64, output: f64) -> Self {
        Self {
            model: model.into(),
            input_per_million: input,
            output_per_million: output,
            cached_input_per_million: None,
            currency: default_currency(),
        }
    }
    pub fn with_cached_input(mut self, rate: f64) -> Self {
        self.cached_input_per_million = Some(rate);
        self
    }
    pub fn gpt_4o() -> Self {
        Self::new("gpt-4o", 5.0, 15.0).with_cached_input(2.5)
    }
    pub fn gpt_4o_mini() -> Self {
        Self::new("gpt-4o-mini", 0.15, 0.6).with_cached_input(0.075)
    }
    pub fn claude_35_sonnet() -> Self {
        Self::new("claude-3-5-sonnet", 3.0, 15.0).with_cached_input(0.3)
    }
    pub fn claude_3_haiku() -> Self {
        Self::new("claude-3-haiku", 0.25, 1.25).with_cached_input(0.03)
    }
    pub fn for_model(model: &str) -> Option<Self> {
        let m = model.to_lowercase();
        if m.contains("gpt-4o-mini") {
            Some(Self::gpt_4o_mini())
        } else if m.contains("gpt-4o") {
            Some(Self::gpt_4o())
        } else if m.contains("claude-3-5-sonnet") {
            Some(Self::claude_35_sonnet())
        } else if m.contains("claude-3-haiku") {
            Some(Self::claude_3_haiku())
        } else {
            None
        }
    }

    /// Input rate actually charged. The cached rate applies only when asked for and present.
    pub fn input_rate(&self, use_cached_input_rate: bool) -> f64 {
        match self.cached_input_per_million {
            Some(cached) if use_cached_input_rate => cached,
            _ => self.input_per_million,
        }
    }

    pub fn calculate_cost(
        &self,
        input_tokens: u64,
        output_tokens: u64,
        use_cached_input_rate: bool,
    ) -> CostEstimate {
        calculate_cost(input_tokens, output_tokens, self, use_cached_input_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: String,
}

impl CostEstimate {
    pub fn format(&self) -> String {
        format!("{} {:.6}", self.currency, self.total_cost)
    }
    /// `$`/`¢` for USD; other currencies are shown by code.
    pub fn format_detailed(&self) -> String {
        if self.currency != "USD" {
            format!("{} {:.4}", self.currency, self.total_cost)
        } else if self.total_cost < 0.01 {
            format!("{:.4}¢", self.total_cost * 100.0)
        } else {
            format!("${:.4}", self.total_cost)
        }
    }
}

/// Price a token usage. Unrounded; `total_cost` is exactly `input_cost + output_cost`.
pub fn calculate_cost(
    input_tokens: u64,
    output_tokens: u64,
    pricing: &ModelPricing,
    use_cached_input_rate: bool,
) -> CostEstimate {
    let ic = (input_tokens as f64 / PER_MILLION) * pricing.input_rate(use_cached_input_rate);
    let oc = (output_tokens as f64 / PER_MILLION) * pricing.output_per_million;
    CostEstimate {
        model: pricing.model.clone(),
        input_tokens,
        output_tokens,
        input_cost: ic,
        output_cost: oc,
        total_cost: ic + oc,
        currency: pricing.currency.clone(),
    }
}

/// Count both texts with `profile` and price the result.
pub fn estimate_text_cost(
    input_text: &str,
    output_text: &str,
    profile: TokenizerProfile,
    pricing: &ModelPricing,
    use_cached_input_rate: bool,
) -> CostEstimate {
    let input = count_tokens(input_text, profile) as u64;
    let output = count_tokens(output_text, profile) as u64;
    calculate_cost(input, output, pricing, use_cached_input_rate)
}
