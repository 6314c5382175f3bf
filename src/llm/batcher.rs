use crate::error::Result;
use crate::llm::client::ClassifyBackend;
use crate::llm::estimator::{estimate_cost, pricing_for};
use crate::llm::parser::parse_classification_response;
use crate::llm::prompts::build_classification_prompt;
use crate::llm::types::{
    ClassificationOutcome, CostAccumulator, BATCH_FAILURE_REASON, REVIEW_LABEL,
};
use crate::schema::{ReportConfig, SearchTermRow};
use log::{info, warn};
use std::time::Duration;

/// Drive classification over the qualifying rows: estimate-and-gate, then one
/// call per `batch_size` slice, writing results back into the rows by
/// position. A failed batch marks only its own rows for manual review; the
/// loop always finishes. The inter-batch pause exists purely for external
/// rate limits and is skipped when `batch_delay_ms` is zero.
///
/// The only error this returns is an unknown pricing model, raised before any
/// call is issued.
pub async fn classify_rows<C: ClassifyBackend>(
    config: &ReportConfig,
    client: &C,
    rows: &mut [SearchTermRow],
    context_text: &str,
    costs: &mut CostAccumulator,
) -> Result<ClassificationOutcome> {
    if rows.is_empty() {
        return Ok(ClassificationOutcome::Skipped {
            reason: "no qualifying terms".to_string(),
        });
    }

    let pricing = pricing_for(config)?;
    let estimate = estimate_cost(config, rows.len(), context_text)?;
    if estimate > config.cost_ceiling_usd {
        info!(
            "Estimated classification cost ${:.4} exceeds ceiling ${:.2}; skipping classification for this run",
            estimate, config.cost_ceiling_usd
        );
        return Ok(ClassificationOutcome::Skipped {
            reason: format!(
                "estimated cost ${:.4} exceeds ceiling ${:.2}",
                estimate, config.cost_ceiling_usd
            ),
        });
    }
    info!(
        "Classifying {} terms with {} (estimated ${:.4})",
        rows.len(),
        config.model,
        estimate
    );

    let batch_size = config.batch_size.max(1);
    let total_batches = rows.len().div_ceil(batch_size);
    let delay = Duration::from_millis(config.batch_delay_ms);
    let mut failed_batches = 0usize;

    for (batch_index, batch) in rows.chunks_mut(batch_size).enumerate() {
        if batch_index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let prompt = build_classification_prompt(batch, context_text);
        match client.classify(&config.model, &prompt).await {
            Ok(response) => {
                let parsed = parse_classification_response(&response.text, batch.len());
                for (row, result) in batch.iter_mut().zip(parsed) {
                    row.classification = result.classification;
                    row.reasoning = result.reasoning;
                }
                costs.record(response.usage, pricing);
                info!(
                    "Batch {}/{} classified ({} terms)",
                    batch_index + 1,
                    total_batches,
                    batch.len()
                );
            }
            Err(e) => {
                warn!(
                    "Batch {}/{} failed: {}. Marking its {} terms for manual review",
                    batch_index + 1,
                    total_batches,
                    e,
                    batch.len()
                );
                failed_batches += 1;
                for row in batch.iter_mut() {
                    row.classification = REVIEW_LABEL.to_string();
                    row.reasoning = BATCH_FAILURE_REASON.to_string();
                }
            }
        }
    }

    info!(
        "Classification finished: {}/{} batches ok, {} input + {} output tokens over {} calls, ${:.4} actual",
        total_batches - failed_batches,
        total_batches,
        costs.input_tokens,
        costs.output_tokens,
        costs.calls,
        costs.cost_usd
    );

    Ok(ClassificationOutcome::Completed {
        batches: total_batches,
        failed_batches,
        cost: costs.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use crate::llm::types::{ClassificationResponse, TokenUsage};
    use crate::schema::RawSearchTermRow;
    use std::cell::RefCell;

    /// Scripted backend: pops one canned reply per call, records prompts.
    struct ScriptedBackend {
        replies: RefCell<Vec<Result<ClassificationResponse>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<ClassificationResponse>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                replies: RefCell::new(replies),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.borrow().len()
        }
    }

    impl ClassifyBackend for ScriptedBackend {
        async fn classify(&self, _model: &str, prompt: &str) -> Result<ClassificationResponse> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(AuditError::Classification("script exhausted".to_string())))
        }
    }

    fn rows(n: usize) -> Vec<SearchTermRow> {
        (0..n)
            .map(|i| {
                RawSearchTermRow {
                    search_term: Some(format!("term {}", i)),
                    ..Default::default()
                }
                .resolve()
            })
            .collect()
    }

    fn reply_for(n: usize, label: &str) -> Result<ClassificationResponse> {
        let text: String = (0..n)
            .map(|i| {
                format!(
                    "TERM: term {}\nCLASSIFICATION: {}\nREASONING: looks {}\n",
                    i, label, label
                )
            })
            .collect();
        Ok(ClassificationResponse {
            text,
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 40,
            },
        })
    }

    fn test_config() -> ReportConfig {
        let mut config = ReportConfig::default();
        config.batch_size = 10;
        config.batch_delay_ms = 0;
        config.cost_ceiling_usd = 5.0;
        config
    }

    #[tokio::test]
    async fn test_twelve_terms_make_two_batches() {
        let config = test_config();
        let backend = ScriptedBackend::new(vec![
            reply_for(10, "RELEVANT"),
            reply_for(2, "GENERIC"),
        ]);
        let mut terms = rows(12);
        let mut costs = CostAccumulator::new();

        let outcome = classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap();

        assert_eq!(backend.calls(), 2);
        assert_eq!(terms.len(), 12);
        match outcome {
            ClassificationOutcome::Completed {
                batches,
                failed_batches,
                ..
            } => {
                assert_eq!(batches, 2);
                assert_eq!(failed_batches, 0);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(terms[..10]
            .iter()
            .all(|r| r.classification == "RELEVANT"));
        assert!(terms[10..].iter().all(|r| r.classification == "GENERIC"));

        // Second prompt carries exactly the two leftover terms.
        let prompts = backend.prompts.borrow();
        assert!(prompts[1].contains("term 10\nterm 11\n"));
        assert!(!prompts[1].contains("term 9"));
    }

    #[tokio::test]
    async fn test_failed_batch_gets_sentinels_others_keep_labels() {
        let config = test_config();
        let backend = ScriptedBackend::new(vec![
            reply_for(10, "RELEVANT"),
            Err(AuditError::Classification("503 overloaded".to_string())),
        ]);
        let mut terms = rows(12);
        let mut costs = CostAccumulator::new();

        let outcome = classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap();

        match outcome {
            ClassificationOutcome::Completed { failed_batches, .. } => {
                assert_eq!(failed_batches, 1)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(terms[..10].iter().all(|r| r.classification == "RELEVANT"));
        for row in &terms[10..] {
            assert_eq!(row.classification, REVIEW_LABEL);
            assert_eq!(row.reasoning, BATCH_FAILURE_REASON);
        }
        // Only the successful call is billed.
        assert_eq!(costs.calls, 1);
        assert_eq!(costs.input_tokens, 100);
    }

    #[tokio::test]
    async fn test_ceiling_skips_without_calling() {
        let mut config = test_config();
        config.cost_ceiling_usd = 0.0000001;
        let backend = ScriptedBackend::new(vec![]);
        let mut terms = rows(12);
        let mut costs = CostAccumulator::new();

        let outcome = classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap();

        assert!(matches!(outcome, ClassificationOutcome::Skipped { .. }));
        assert_eq!(backend.calls(), 0);
        assert!(terms.iter().all(|r| r.classification.is_empty()));
    }

    #[tokio::test]
    async fn test_unknown_model_is_fatal_before_any_call() {
        let mut config = test_config();
        config.model = "gemini-9000-ultra".to_string();
        let backend = ScriptedBackend::new(vec![]);
        let mut terms = rows(3);
        let mut costs = CostAccumulator::new();

        let err = classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::UnknownModel(_)));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_rows_is_skipped() {
        let config = test_config();
        let backend = ScriptedBackend::new(vec![]);
        let mut terms = rows(0);
        let mut costs = CostAccumulator::new();

        let outcome = classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap();
        assert!(matches!(outcome, ClassificationOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_usage_accumulates_across_batches() {
        let config = test_config();
        let backend = ScriptedBackend::new(vec![
            reply_for(10, "RELEVANT"),
            reply_for(10, "RELEVANT"),
            reply_for(5, "IRRELEVANT"),
        ]);
        let mut terms = rows(25);
        let mut costs = CostAccumulator::new();

        classify_rows(&config, &backend, &mut terms, "", &mut costs)
            .await
            .unwrap();
        assert_eq!(costs.calls, 3);
        assert_eq!(costs.input_tokens, 300);
        assert_eq!(costs.output_tokens, 120);
        assert!(costs.cost_usd > 0.0);
    }
}
