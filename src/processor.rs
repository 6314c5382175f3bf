use crate::filter::ThresholdFilter;
use crate::keywords::{CampaignKeywordIndex, KeywordSource};
use crate::schema::{RawSearchTermRow, ReportConfig, SearchTermRow};
use log::{info, warn};

/// Single forward pass over the platform's row stream. Each row is resolved
/// defensively, deduplicated against the campaign's keyword inventory and run
/// through the threshold filter; qualifiers are accumulated in input order.
/// A row that fails to deserialize is logged and skipped, never fatal.
pub fn collect_qualifying_terms<S, I>(
    config: &ReportConfig,
    rows: I,
    index: &mut CampaignKeywordIndex<'_, S>,
) -> Vec<SearchTermRow>
where
    S: KeywordSource,
    I: IntoIterator<Item = serde_json::Value>,
{
    let filter = ThresholdFilter::new(config);
    let mut qualifying = Vec::new();
    let mut processed = 0usize;
    let mut malformed = 0usize;

    for value in rows {
        processed += 1;
        if processed % 1000 == 0 {
            info!(
                "Processed {} search terms, {} qualifying so far",
                processed,
                qualifying.len()
            );
        }

        let raw: RawSearchTermRow = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping malformed row {}: {}", processed, e);
                malformed += 1;
                continue;
            }
        };
        let row = raw.resolve();

        if index.is_keyword(&row.search_term, row.campaign_id) {
            continue;
        }
        if filter.qualifies(&row) {
            qualifying.push(row);
        }
    }

    info!(
        "Processed {} search terms: {} qualifying, {} malformed, {} campaigns indexed",
        processed,
        qualifying.len(),
        malformed,
        index.cached_campaigns()
    );

    qualifying
}
