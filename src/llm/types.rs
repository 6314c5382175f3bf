use crate::schema::ModelPricing;
use serde::{Deserialize, Serialize};

/// Label applied when no real classification could be obtained for a term.
pub const REVIEW_LABEL: &str = "REVIEW";
/// Reasoning attached when the response had fewer records than terms.
pub const PARSE_FAILURE_REASON: &str = "failed to parse";
/// Reasoning attached when a whole batch's call failed.
pub const BATCH_FAILURE_REASON: &str = "Classification call failed; manual review required";

/// One term's verdict as recovered from the model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermClassification {
    pub classification: String,
    pub reasoning: String,
}

impl TermClassification {
    pub fn review(reasoning: &str) -> Self {
        Self {
            classification: REVIEW_LABEL.to_string(),
            reasoning: reasoning.to_string(),
        }
    }
}

/// Token counts as reported by the API for one call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Raw model output plus its reported usage.
#[derive(Debug, Clone)]
pub struct ClassificationResponse {
    pub text: String,
    pub usage: TokenUsage,
}

/// Actual spend across a run's classification calls. One fresh instance per
/// run; only successful calls are recorded, so the total never decreases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CostAccumulator {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub calls: usize,
    pub cost_usd: f64,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, usage: TokenUsage, pricing: ModelPricing) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.calls += 1;
        self.cost_usd += usage.input_tokens as f64 / 1000.0 * pricing.input_per_1k
            + usage.output_tokens as f64 / 1000.0 * pricing.output_per_1k;
    }
}

/// What the classification phase did with the qualifying rows.
#[derive(Debug, Clone, Serialize)]
pub enum ClassificationOutcome {
    /// Phase never ran; every row keeps empty classification fields.
    Skipped { reason: String },
    Completed {
        batches: usize,
        failed_batches: usize,
        cost: CostAccumulator,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_records_usage() {
        let pricing = ModelPricing {
            input_per_1k: 0.001,
            output_per_1k: 0.002,
        };
        let mut acc = CostAccumulator::new();
        acc.record(
            TokenUsage {
                input_tokens: 1000,
                output_tokens: 500,
            },
            pricing,
        );
        acc.record(
            TokenUsage {
                input_tokens: 2000,
                output_tokens: 1000,
            },
            pricing,
        );

        assert_eq!(acc.input_tokens, 3000);
        assert_eq!(acc.output_tokens, 1500);
        assert_eq!(acc.calls, 2);
        assert!((acc.cost_usd - 0.006).abs() < 1e-9);
    }
}
