use crate::error::{AuditError, Result};
use crate::schema::{ModelPricing, ReportConfig};

/// Average prompt tokens one term contributes, instruction overhead included.
pub const INPUT_TOKENS_PER_TERM: u64 = 20;
/// Average completion tokens for one term's three-line answer.
pub const OUTPUT_TOKENS_PER_TERM: u64 = 50;
/// Rough characters-per-token divisor for the context text.
const CHARS_PER_TOKEN: u64 = 4;

/// Pricing for the configured model. An unknown model is fatal here, before
/// any call is issued, rather than silently defaulting to some other rate.
pub fn pricing_for(config: &ReportConfig) -> Result<ModelPricing> {
    config
        .pricing
        .get(&config.model)
        .copied()
        .ok_or_else(|| AuditError::UnknownModel(config.model.clone()))
}

/// Predict the classification spend for `term_count` terms before any call is
/// made. Deterministic: fixed per-term constants plus chars/4 for the context
/// text, priced at the configured model's per-1k rates.
pub fn estimate_cost(config: &ReportConfig, term_count: usize, context_text: &str) -> Result<f64> {
    let pricing = pricing_for(config)?;

    let count = term_count as u64;
    let context_tokens = context_text.chars().count() as u64 / CHARS_PER_TOKEN;
    let input_tokens = count * INPUT_TOKENS_PER_TERM + context_tokens;
    let output_tokens = count * OUTPUT_TOKENS_PER_TERM;

    Ok(input_tokens as f64 / 1000.0 * pricing.input_per_1k
        + output_tokens as f64 / 1000.0 * pricing.output_per_1k)
}
