//! Per-channel token weights and the weighted-token aggregation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Relative energy cost of each token channel, fresh uncached input = 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenWeights {
    /// Fresh input that is written to the prompt cache
    pub input_with_cache: f64,
    /// Fresh input, not cached
    pub input_without_cache: f64,
    /// Input served from the prompt cache
    pub cache_read: f64,
    pub output_tokens: f64,
}

/// Weights applied when neither the caller nor the model supplies any.
pub const DEFAULT_TOKEN_WEIGHTS: TokenWeights = TokenWeights {
    input_with_cache: 1.25,
    input_without_cache: 1.0,
    cache_read: 0.1,
    output_tokens: 5.0,
};

impl Default for TokenWeights {
    fn default() -> Self {
        DEFAULT_TOKEN_WEIGHTS
    }
}

impl TokenWeights {
    /// Every weight must be finite and non-negative.
    pub fn check(&self) -> std::result::Result<(), String> {
        let named = [
            ("inputWithCache", self.input_with_cache),
            ("inputWithoutCache", self.input_without_cache),
            ("cacheRead", self.cache_read),
            ("outputTokens", self.output_tokens),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("token weight {} must be >= 0 (got {})", name, w));
            }
        }
        Ok(())
    }
}

/// Four-way token usage split. Absent fields count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_with_cache: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_without_cache: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<i64>,
}

impl TokenBreakdown {
    pub fn new(
        input_with_cache: i64,
        input_without_cache: i64,
        cache_read: i64,
        output_tokens: i64,
    ) -> Self {
        Self {
            input_with_cache: Some(input_with_cache),
            input_without_cache: Some(input_without_cache),
            cache_read: Some(cache_read),
            output_tokens: Some(output_tokens),
        }
    }

    /// True when at least one channel was supplied, even if it is zero.
    pub fn has_any_field(&self) -> bool {
        self.fields().iter().any(|(_, v)| v.is_some())
    }

    /// Channels in canonical order with their wire names.
    pub fn fields(&self) -> [(&'static str, Option<i64>); 4] {
        [
            ("inputWithCache", self.input_with_cache),
            ("inputWithoutCache", self.input_without_cache),
            ("cacheRead", self.cache_read),
            ("outputTokens", self.output_tokens),
        ]
    }
}

/// `Σ weight × count` over the four channels; [`DEFAULT_TOKEN_WEIGHTS`] when `weights` is `None`.
pub fn weighted_tokens(breakdown: &TokenBreakdown, weights: Option<&TokenWeights>) -> f64 {
    let w = weights.unwrap_or(&DEFAULT_TOKEN_WEIGHTS);
    let count = |v: Option<i64>| v.unwrap_or(0) as f64;
    w.input_with_cache * count(breakdown.input_with_cache)
        + w.input_without_cache * count(breakdown.input_without_cache)
        + w.cache_read * count(breakdown.cache_read)
        + w.output_tokens * count(breakdown.output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_linear() {
        let (a, b, c, d) = (120.0, 340.0, 5600.0, 78.0);
        let breakdown = TokenBreakdown::new(120, 340, 5600, 78);
        assert_eq!(
            weighted_tokens(&breakdown, None),
            1.25 * a + 1.0 * b + 0.1 * c + 5.0 * d
        );
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let breakdown = TokenBreakdown {
            output_tokens: Some(10),
            ..Default::default()
        };
        assert_eq!(weighted_tokens(&breakdown, None), 50.0);
        assert_eq!(weighted_tokens(&TokenBreakdown::default(), None), 0.0);
    }

    #[test]
    fn test_explicit_weights_override_defaults() {
        let weights = TokenWeights {
            input_with_cache: 2.0,
            input_without_cache: 1.0,
            cache_read: 0.0,
            output_tokens: 3.0,
        };
        let breakdown = TokenBreakdown::new(10, 10, 1000, 10);
        assert_eq!(weighted_tokens(&breakdown, Some(&weights)), 60.0);
    }

    #[test]
    fn test_has_any_field_counts_explicit_zero() {
        assert!(!TokenBreakdown::default().has_any_field());
        let zero = TokenBreakdown {
            cache_read: Some(0),
            ..Default::default()
        };
        assert!(zero.has_any_field());
    }

    #[test]
    fn test_default_constant_matches_default_impl() {
        assert_eq!(TokenWeights::default(), DEFAULT_TOKEN_WEIGHTS);
        assert!(DEFAULT_TOKEN_WEIGHTS.check().is_ok());
    }
}
