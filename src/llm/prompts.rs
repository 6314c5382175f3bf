use crate::schema::SearchTermRow;

/// The label set the instructions offer and the parser expects back. This is
/// a wire contract: changing it here without changing the response format
/// below (and the parser prefixes) breaks every batch.
pub const CLASSIFICATION_LABELS: [&str; 5] = [
    "RELEVANT",
    "SEMI_RELEVANT",
    "IRRELEVANT",
    "COMPETITOR",
    "GENERIC",
];

const CLASSIFICATION_INSTRUCTIONS: &str = r#"## INSTRUCTIONS
You are auditing search terms that triggered ads for this business. Classify
EVERY search term listed above into exactly one of:

- RELEVANT: clearly matches the products or services the business sells
- SEMI_RELEVANT: related to the business but unlikely to convert as written
- IRRELEVANT: unrelated to what the business sells
- COMPETITOR: names a competing brand, product or vendor
- GENERIC: too broad or ambiguous to signal purchase intent

For each search term, in the same order as the list above, output exactly
three lines:

TERM: <the search term, verbatim>
CLASSIFICATION: <one label from the list>
REASONING: <one short sentence>

Output nothing else: no numbering, no markdown, no summary.
"#;

/// Render the prompt for one batch. Deterministic: same rows and context
/// always produce the same text.
pub fn build_classification_prompt(rows: &[SearchTermRow], context_text: &str) -> String {
    let mut prompt = String::from("## SEARCH TERMS\n");
    for row in rows {
        prompt.push_str(&row.search_term);
        prompt.push('\n');
    }

    if !context_text.is_empty() {
        prompt.push_str("\n## WEBSITE CONTEXT\n");
        prompt.push_str(context_text);
        prompt.push('\n');
    }

    prompt.push('\n');
    prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
    prompt
}
