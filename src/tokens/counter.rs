//! Token counter implementations.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Tokenizer family used to count tokens for a model.
///
/// Every variant except [`TokenizerProfile::Approximate`] maps onto a real BPE
/// vocabulary, so counts match what the provider bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerProfile {
    /// GPT-4, GPT-3.5-turbo, text-embedding-3
    Cl100kBase,
    /// GPT-4o, o1/o3 families
    O200kBase,
    /// Codex, text-davinci-002/003
    P50kBase,
    /// GPT-3 (davinci, curie, babbage, ada)
    R50kBase,
    /// No public vocabulary; always uses the character estimate
    Approximate,
}

impl TokenizerProfile {
    /// Infer the tokenizer family from a model name.
    pub fn from_model_name(model: &str) -> Self {
        let m = model.to_lowercase();
        if m.contains("gpt-4o") || m.contains("gpt-4.1") || m.starts_with("o1") || m.starts_with("o3")
        {
            TokenizerProfile::O200kBase
        } else if m.contains("gpt-4") || m.contains("gpt-3.5") || m.contains("text-embedding") {
            TokenizerProfile::Cl100kBase
        } else if m.starts_with("code-")
            || m.contains("text-davinci-002")
            || m.contains("text-davinci-003")
        {
            TokenizerProfile::P50kBase
        } else if m.contains("davinci")
            || m.contains("curie")
            || m.contains("babbage")
            || m.contains("ada")
            || m.contains("gpt-3")
            || m.contains("gpt-2")
        {
            TokenizerProfile::R50kBase
        } else {
            TokenizerProfile::Approximate
        }
    }

    /// Name of the BPE encoding backing this profile, if any.
    pub fn encoding_name(&self) -> Option<&'static str> {
        match self {
            TokenizerProfile::Cl100kBase => Some("cl100k_base"),
            TokenizerProfile::O200kBase => Some("o200k_base"),
            TokenizerProfile::P50kBase => Some("p50k_base"),
            TokenizerProfile::R50kBase => Some("r50k_base"),
            TokenizerProfile::Approximate => None,
        }
    }
}

impl TokenizerProfile {
    pub fn as_str(&self) -> &'static str {
        self.encoding_name().unwrap_or("approximate")
    }
}

impl std::fmt::Display for TokenizerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenizerProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cl100k_base" | "cl100k" => Ok(TokenizerProfile::Cl100kBase),
            "o200k_base" | "o200k" => Ok(TokenizerProfile::O200kBase),
            "p50k_base" | "p50k" => Ok(TokenizerProfile::P50kBase),
            "r50k_base" | "r50k" => Ok(TokenizerProfile::R50kBase),
            "approximate" | "chars" => Ok(TokenizerProfile::Approximate),
            _ => Err(format!("Unknown tokenizer profile: {}", s)),
        }
    }
}

/// Failures inside the tokenizer layer. Never surfaced by [`count_tokens`].
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    #[error("no subword vocabulary available for tokenizer profile {0:?}")]
    Unsupported(TokenizerProfile),

    #[error("failed to load {encoding} vocabulary: {reason}")]
    Load {
        encoding: &'static str,
        reason: String,
    },

    #[error("encoding failed: {0}")]
    Encode(String),
}

/// A subword encoder that can report how many tokens a text encodes to.
pub trait TokenEncoder: Send + Sync {
    fn encode_len(&self, text: &str) -> Result<usize, TokenizerError>;
}

#[cfg(feature = "bpe")]
impl TokenEncoder for tiktoken_rs::CoreBPE {
    fn encode_len(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.encode_ordinary(text).len())
    }
}

pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Character-length approximation, `ceil(chars / ratio)`.
#[derive(Debug, Clone)]
pub struct CharacterEstimator {
    chars_per_token: f64,
}
impl CharacterEstimator {
    pub fn new() -> Self {
        Self::with_ratio(4.0)
    }
    pub fn with_ratio(r: f64) -> Self {
        Self { chars_per_token: r }
    }
}
impl Default for CharacterEstimator {
    fn default() -> Self {
        Self::new()
    }
}
impl TokenCounter for CharacterEstimator {
    fn count(&self, text: &str) -> usize {
        (text.chars().count() as f64 / self.chars_per_token).ceil() as usize
    }
}

/// Counter bound to one tokenizer profile; degrades to the character estimate.
#[derive(Debug, Clone, Copy)]
pub struct BpeCounter {
    profile: TokenizerProfile,
}
impl BpeCounter {
    pub fn new(profile: TokenizerProfile) -> Self {
        Self { profile }
    }
    pub fn profile(&self) -> TokenizerProfile {
        self.profile
    }
}
impl TokenCounter for BpeCounter {
    fn count(&self, text: &str) -> usize {
        count_tokens(text, self.profile)
    }
}

static ENCODERS: Lazy<RwLock<HashMap<TokenizerProfile, Arc<dyn TokenEncoder>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Shared encoder for `profile`, built once and reused by every caller.
pub fn encoder_for(profile: TokenizerProfile) -> Result<Arc<dyn TokenEncoder>, TokenizerError> {
    {
        let cache = ENCODERS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(enc) = cache.get(&profile) {
            return Ok(enc.clone());
        }
    }
    let encoder = load_encoder(profile)?;
    let mut cache = ENCODERS.write().unwrap_or_else(PoisonError::into_inner);
    // Another thread may have won the race; keep the first one.
    Ok(cache.entry(profile).or_insert(encoder).clone())
}

#[cfg(feature = "bpe")]
fn load_encoder(profile: TokenizerProfile) -> Result<Arc<dyn TokenEncoder>, TokenizerError> {
    let encoding = profile
        .encoding_name()
        .ok_or(TokenizerError::Unsupported(profile))?;
    let bpe = match profile {
        TokenizerProfile::Cl100kBase => tiktoken_rs::cl100k_base(),
        TokenizerProfile::O200kBase => tiktoken_rs::o200k_base(),
        TokenizerProfile::P50kBase => tiktoken_rs::p50k_base(),
        TokenizerProfile::R50kBase => tiktoken_rs::r50k_base(),
        TokenizerProfile::Approximate => return Err(TokenizerError::Unsupported(profile)),
    };
    let bpe = bpe.map_err(|e| TokenizerError::Load {
        encoding,
        reason: e.to_string(),
    })?;
    tracing::debug!(encoding, "loaded BPE vocabulary");
    Ok(Arc::new(bpe))
}

#[cfg(not(feature = "bpe"))]
fn load_encoder(profile: TokenizerProfile) -> Result<Arc<dyn TokenEncoder>, TokenizerError> {
    Err(TokenizerError::Unsupported(profile))
}

/// `ceil(chars / 4)`, the estimate used whenever real tokenization is unavailable.
pub fn fallback_count(text: &str) -> usize {
    CharacterEstimator::new().count(text)
}

/// Count tokens in `text` for the given tokenizer profile.
///
/// Blank text counts as zero. [`TokenizerProfile::Approximate`] always uses
/// [`fallback_count`]; for other profiles a missing or failing encoder is logged
/// and replaced by it. This function never fails.
pub fn count_tokens(text: &str, profile: TokenizerProfile) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    if profile == TokenizerProfile::Approximate {
        return fallback_count(text);
    }
    match encoder_for(profile) {
        Ok(encoder) => count_tokens_with(text, encoder.as_ref()),
        Err(e) => {
            tracing::warn!(?profile, error = %e, "tokenizer unavailable, using character estimate");
            fallback_count(text)
        }
    }
}

/// Count tokens with an explicit encoder, falling back on encoder failure.
pub fn count_tokens_with(text: &str, encoder: &dyn TokenEncoder) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    match encoder.encode_len(text) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "tokenization failed, using character estimate");
            fallback_count(text)
        }
    }
}

/// Counter for a model name, choosing the tokenizer family by name.
pub fn get_token_counter(model: &str) -> Arc<dyn TokenCounter> {
    Arc::new(BpeCounter::new(TokenizerProfile::from_model_name(model)))
}
