//! Token counting and cost tests

use ai_carbon_rust::tokens::{
    calculate_cost, count_tokens, count_tokens_with, estimate_text_cost, get_token_counter,
    ModelPricing, TokenCounter, TokenEncoder, TokenizerError, TokenizerProfile,
};

struct BrokenVocabulary;

impl TokenEncoder for BrokenVocabulary {
    fn encode_len(&self, _text: &str) -> Result<usize, TokenizerError> {
        Err(TokenizerError::Load {
            encoding: "cl100k_base",
            reason: "truncated table".into(),
        })
    }
}

#[test]
fn test_tokenizer_failure_degrades_to_character_estimate() {
    let text = "Energy per token depends on hardware throughput and facility overhead.";
    let n = count_tokens_with(text, &BrokenVocabulary);
    let expected = (text.chars().count() as f64 / 4.0).ceil() as usize;
    assert_eq!(n, expected);
    assert!(n > 0);
}

#[test]
fn test_unsupported_profile_never_panics() {
    let n = count_tokens("Ünïcödé text with émojis 🌍🌱", TokenizerProfile::Approximate);
    assert!(n > 0);
}

#[test]
fn test_counts_are_positive_for_every_profile() {
    let text = "fn main() { println!(\"hello\"); }";
    for profile in [
        TokenizerProfile::Cl100kBase,
        TokenizerProfile::O200kBase,
        TokenizerProfile::P50kBase,
        TokenizerProfile::R50kBase,
        TokenizerProfile::Approximate,
    ] {
        let n = count_tokens(text, profile);
        assert!(n > 0, "{profile} produced zero tokens");
        assert!(n < text.len(), "{profile} produced {n} tokens");
    }
}

#[test]
fn test_concurrent_counting() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("thread {i} counts tokens concurrently");
                count_tokens(&text, TokenizerProfile::O200kBase)
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap() > 0);
    }
}

#[test]
fn test_model_counter_matches_profile() {
    let counter = get_token_counter("gpt-4o");
    let text = "The same text, counted twice.";
    assert_eq!(
        counter.count(text),
        count_tokens(text, TokenizerProfile::O200kBase)
    );
}

#[test]
fn test_cost_scenario() {
    let pricing = ModelPricing::new("scenario", 5.0, 15.0);
    let cost = calculate_cost(1_000_000, 500_000, &pricing, false);
    assert_eq!(cost.input_cost, 5.0);
    assert_eq!(cost.output_cost, 7.5);
    assert_eq!(cost.total_cost, 12.5);
    assert_eq!(cost.total_cost, cost.input_cost + cost.output_cost);
}

#[test]
fn test_cost_with_cached_rate() {
    let pricing = ModelPricing::claude_35_sonnet();
    let standard = calculate_cost(1_000_000, 0, &pricing, false);
    let cached = calculate_cost(1_000_000, 0, &pricing, true);
    assert_eq!(standard.input_cost, 3.0);
    assert_eq!(cached.input_cost, 0.3);
}

#[test]
fn test_text_cost_empty_texts_are_free() {
    let cost = estimate_text_cost(
        "",
        "   ",
        TokenizerProfile::Cl100kBase,
        &ModelPricing::gpt_4o(),
        false,
    );
    assert_eq!(cost.input_tokens, 0);
    assert_eq!(cost.output_tokens, 0);
    assert_eq!(cost.total_cost, 0.0);
}
