//! # Token Counting and Cost Estimation Module
//!
//! Turns raw text into token counts and token counts into money.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`count_tokens`] | Count tokens for a [`TokenizerProfile`], never fails |
//! | [`TokenizerProfile`] | Tokenizer family (cl100k, o200k, p50k, r50k, approximate) |
//! | [`TokenEncoder`] | Seam for subword encoders; `tiktoken-rs` BPEs implement it |
//! | [`CharacterEstimator`] | `ceil(chars / 4)` fallback |
//! | [`ModelPricing`] | Per-million-token rates, with optional cached-input rate |
//! | [`CostEstimate`] | Estimated cost breakdown |
//!
//! ## Example
//!
//! ```rust
//! use ai_carbon_rust::tokens::{count_tokens, calculate_cost, ModelPricing, TokenizerProfile};
//!
//! let input = count_tokens("Hello, how are you?", TokenizerProfile::Cl100kBase);
//! let estimate = calculate_cost(input as u64, 100, &ModelPricing::gpt_4o(), false);
//! println!("Estimated cost: ${:.6}", estimate.total_cost);
//! ```
//!
//! ## Failure policy
//!
//! Tokenization prefers availability over precision: a vocabulary that cannot be
//! loaded or an encoder that fails degrades to the character estimate with a
//! `warn` log.
//! Encoders are built lazily, once per profile, and shared across threads.

mod counter;
mod pricing;

pub use counter::{
    count_tokens, count_tokens_with, encoder_for, fallback_count, get_token_counter, BpeCounter,
    CharacterEstimator, TokenCounter, TokenEncoder, TokenizerError, TokenizerProfile,
};
pub use pricing::{calculate_cost, estimate_text_cost, CostEstimate, ModelPricing};
