//! # Search Term Auditor
//!
//! A library for turning raw search-term performance rows from an advertising
//! platform into an actionable spreadsheet report: terms that spent real money
//! without earning their keep are collected, deduplicated against the keyword
//! inventory they would compete with, optionally classified by Gemini, and
//! exported with their metrics.
//!
//! ## Core Concepts
//!
//! - **Qualifying term**: a search term that is not already an enabled keyword
//!   in its campaign, was not already added/excluded by the platform, clears
//!   the configured cost/click/conversion floors, and fails the configured
//!   CPA or ROAS target.
//! - **Keyword index**: per-campaign set of enabled keyword texts, fetched
//!   lazily and cached for the run. Fetch failures fail open so a platform
//!   hiccup never hides a spending term from the report.
//! - **Classification batches**: qualifying terms are sent to the model in
//!   fixed-size slices; a failed batch degrades to REVIEW sentinels instead
//!   of failing the run. Spend is estimated up front and the whole phase is
//!   skipped when the estimate exceeds the configured ceiling.
//!
//! ## Example
//!
//! ```rust,ignore
//! use search_term_auditor::*;
//!
//! let config = ReportConfig::default();
//! let rows: Vec<serde_json::Value> = platform_query(&config)?;
//!
//! let outcome = run_audit(&config, rows, &platform_keywords).await?;
//! println!(
//!     "{} terms exported to {}",
//!     outcome.rows.len(),
//!     outcome.export_path.display()
//! );
//! ```

pub mod dates;
pub mod error;
pub mod export;
pub mod filter;
pub mod keywords;
pub mod processor;
pub mod schema;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use dates::{resolve_date_range, DateRange};
pub use error::{AuditError, Result};
pub use export::{export_report, spreadsheet_row, REPORT_HEADERS};
pub use filter::ThresholdFilter;
pub use keywords::{CampaignKeywordIndex, KeywordSource};
pub use processor::collect_qualifying_terms;
pub use schema::*;
pub use utils::{clean_web_text, MAX_CONTEXT_CHARS};

#[cfg(feature = "gemini")]
use log::{debug, info, warn};

/// Collect the qualifying rows for a run, building the keyword index from the
/// given source. This is the whole pipeline minus classification and export.
pub fn collect_search_terms<S, I>(
    config: &ReportConfig,
    rows: I,
    keyword_source: &S,
) -> Vec<SearchTermRow>
where
    S: KeywordSource,
    I: IntoIterator<Item = serde_json::Value>,
{
    let mut index =
        CampaignKeywordIndex::new(keyword_source, config.campaign_name_excludes.as_deref());
    collect_qualifying_terms(config, rows, &mut index)
}

/// Everything a finished run produced.
#[cfg(feature = "gemini")]
pub struct AuditOutcome {
    pub rows: Vec<SearchTermRow>,
    pub classification: llm::ClassificationOutcome,
    pub export_path: std::path::PathBuf,
}

/// Run the full report: collect qualifiers, classify them when the run is
/// configured and funded for it, export the result. Classification problems
/// degrade (skipped phase or sentinel labels); only an unknown pricing model
/// or a failed export aborts the run.
#[cfg(feature = "gemini")]
pub async fn run_audit<S, I>(
    config: &ReportConfig,
    rows: I,
    keyword_source: &S,
) -> Result<AuditOutcome>
where
    S: KeywordSource,
    I: IntoIterator<Item = serde_json::Value>,
{
    let mut qualifying = collect_search_terms(config, rows, keyword_source);

    let mut costs = llm::CostAccumulator::new();
    let classification = match resolve_api_key(config) {
        Ok(api_key) => {
            let client = llm::GeminiClient::new(api_key);
            let context_text = fetch_context(&client, config).await;
            llm::classify_rows(config, &client, &mut qualifying, &context_text, &mut costs)
                .await?
        }
        Err(reason) => llm::ClassificationOutcome::Skipped { reason },
    };

    let export_path = export_report(&qualifying, config)?;
    Ok(AuditOutcome {
        rows: qualifying,
        classification,
        export_path,
    })
}

/// The API key from the configured environment variable, or the reason the
/// classification phase is being skipped. An absent key and an unreadable key
/// get distinct log lines; both degrade the same way.
#[cfg(feature = "gemini")]
fn resolve_api_key(config: &ReportConfig) -> std::result::Result<String, String> {
    use std::env::VarError;

    if !config.enable_classification {
        info!("Classification disabled by configuration");
        return Err("classification disabled".to_string());
    }

    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Ok(_) => {
            warn!(
                "API key variable {} is set but empty; skipping classification",
                config.api_key_env
            );
            Err(format!("API key variable {} is empty", config.api_key_env))
        }
        Err(VarError::NotPresent) => {
            info!(
                "API key variable {} not set; skipping classification",
                config.api_key_env
            );
            Err(format!("API key variable {} not set", config.api_key_env))
        }
        Err(VarError::NotUnicode(_)) => {
            warn!(
                "API key variable {} is not valid unicode; skipping classification",
                config.api_key_env
            );
            Err(format!(
                "API key variable {} is not valid unicode",
                config.api_key_env
            ))
        }
    }
}

/// Website context for the prompts, already cleaned and capped. A fetch
/// failure logs and classifies without context rather than failing the run.
#[cfg(feature = "gemini")]
async fn fetch_context(client: &llm::GeminiClient, config: &ReportConfig) -> String {
    let Some(url) = config.website_url.as_deref() else {
        return String::new();
    };
    match client.fetch_page_text(url).await {
        Ok(body) => {
            let text = clean_web_text(&body);
            debug!(
                "Fetched {} chars of website context from {}",
                text.chars().count(),
                url
            );
            text
        }
        Err(e) => {
            warn!(
                "Website context fetch failed for {}: {}. Classifying without context",
                url, e
            );
            String::new()
        }
    }
}
