use crate::llm::types::{TermClassification, PARSE_FAILURE_REASON};

/// Recover exactly `expected` classification records from a model response.
///
/// The scan is line-oriented and positional: a `TERM:` line starts a new
/// record (flushing the previous one when both of its fields were filled),
/// `CLASSIFICATION:` and `REASONING:` lines set the current record's fields.
/// Short or garbled responses pad the tail with REVIEW sentinels; overlong
/// ones are truncated. This function never fails. It also does not check the
/// echoed term text against the input order; the model is trusted to answer
/// in sequence.
pub fn parse_classification_response(
    response: &str,
    expected: usize,
) -> Vec<TermClassification> {
    let mut results = Vec::with_capacity(expected);
    let mut classification = String::new();
    let mut reasoning = String::new();

    for line in response.lines() {
        let line = line.trim();
        if line.starts_with("TERM:") {
            flush(&mut results, &mut classification, &mut reasoning);
        } else if let Some(rest) = line.strip_prefix("CLASSIFICATION:") {
            classification = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("REASONING:") {
            reasoning = rest.trim().to_string();
        }
    }
    flush(&mut results, &mut classification, &mut reasoning);

    while results.len() < expected {
        results.push(TermClassification::review(PARSE_FAILURE_REASON));
    }
    results.truncate(expected);
    results
}

fn flush(
    results: &mut Vec<TermClassification>,
    classification: &mut String,
    reasoning: &mut String,
) {
    if !classification.is_empty() && !reasoning.is_empty() {
        results.push(TermClassification {
            classification: std::mem::take(classification),
            reasoning: std::mem::take(reasoning),
        });
    } else {
        classification.clear();
        reasoning.clear();
    }
}
