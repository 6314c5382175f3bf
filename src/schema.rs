use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Disposition the platform already recorded for a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermStatus {
    None,
    Added,
    Excluded,
    AddedExcluded,
    Unknown,
}

impl TermStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NONE" | "" => TermStatus::None,
            "ADDED" => TermStatus::Added,
            "EXCLUDED" => TermStatus::Excluded,
            "ADDED_EXCLUDED" => TermStatus::AddedExcluded,
            _ => TermStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TermStatus::None => "NONE",
            TermStatus::Added => "ADDED",
            TermStatus::Excluded => "EXCLUDED",
            TermStatus::AddedExcluded => "ADDED_EXCLUDED",
            TermStatus::Unknown => "UNKNOWN",
        }
    }

    /// True when the platform has already added or negated this term, so the
    /// report has nothing left to recommend for it.
    pub fn already_actioned(&self) -> bool {
        matches!(
            self,
            TermStatus::Added | TermStatus::Excluded | TermStatus::AddedExcluded
        )
    }
}

/// One platform row as it arrives over the wire. Every field is optional so a
/// sparse or partially-populated row deserializes instead of failing; defaults
/// are resolved once, at this boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchTermRow {
    pub search_term: Option<String>,
    pub status: Option<String>,
    pub campaign_id: Option<i64>,
    pub campaign_name: Option<String>,
    pub ad_group_id: Option<i64>,
    pub ad_group_name: Option<String>,
    pub impressions: Option<u64>,
    pub clicks: Option<u64>,
    pub cost_micros: Option<i64>,
    pub conversions: Option<f64>,
    pub conversions_value: Option<f64>,
}

impl RawSearchTermRow {
    /// Resolve missing fields to empty/zero and derive cost, CPA and ROAS.
    pub fn resolve(self) -> SearchTermRow {
        let cost = self.cost_micros.unwrap_or(0).max(0) as f64 / 1_000_000.0;
        let conversions = self.conversions.unwrap_or(0.0).max(0.0);
        let conversion_value = self.conversions_value.unwrap_or(0.0).max(0.0);

        let cpa = if conversions > 0.0 {
            cost / conversions
        } else {
            0.0
        };
        let roas = if cost > 0.0 {
            conversion_value / cost
        } else {
            0.0
        };

        SearchTermRow {
            search_term: self.search_term.unwrap_or_default(),
            status: TermStatus::parse(self.status.as_deref().unwrap_or("")),
            campaign_id: self.campaign_id.unwrap_or(0),
            campaign_name: self.campaign_name.unwrap_or_default(),
            ad_group_id: self.ad_group_id.unwrap_or(0),
            ad_group_name: self.ad_group_name.unwrap_or_default(),
            impressions: self.impressions.unwrap_or(0),
            clicks: self.clicks.unwrap_or(0),
            cost,
            conversions,
            conversion_value,
            cpa,
            roas,
            classification: String::new(),
            reasoning: String::new(),
        }
    }
}

/// A fully-resolved search-term row. Created once per platform row; the
/// classification fields start empty and are filled in place by the batcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTermRow {
    pub search_term: String,
    pub status: TermStatus,
    pub campaign_id: i64,
    pub campaign_name: String,
    pub ad_group_id: i64,
    pub ad_group_name: String,
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub cpa: f64,
    pub roas: f64,
    pub classification: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TargetMode {
    /// Keep terms whose cost-per-acquisition is at or below the target.
    Cpa,
    /// Keep terms whose return-on-ad-spend is at or above the target.
    Roas,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetRule {
    pub mode: TargetMode,
    pub value: f64,
}

/// Price per 1000 tokens for one model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Run-time constants for a single report run. JSON round-trippable so callers
/// can keep it in a config file next to their credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Export target. A directory resolves to `<dir>/<sheet_name>.csv`.
    pub spreadsheet_path: PathBuf,
    pub sheet_name: String,

    pub enable_classification: bool,
    /// Environment variable holding the Gemini API key.
    pub api_key_env: String,
    /// Optional page whose text is fed to the classifier as business context.
    pub website_url: Option<String>,
    pub model: String,
    pub batch_size: usize,
    /// Pause between classification calls, to stay under external rate limits.
    pub batch_delay_ms: u64,
    /// Estimated-cost ceiling in USD. Exceeding it skips classification.
    pub cost_ceiling_usd: f64,
    pub pricing: BTreeMap<String, ModelPricing>,

    pub min_cost: f64,
    pub min_clicks: u64,
    pub min_conversions: f64,
    pub target: TargetRule,

    /// Days back from today the reporting window ends (platform data lags).
    pub lookback_days: i64,
    /// Width of the reporting window in days.
    pub window_days: i64,
    pub manual_start: Option<String>,
    pub manual_end: Option<String>,

    /// Substring the platform query uses to narrow campaigns; applied by the
    /// data source, not by this crate.
    pub campaign_name_contains: Option<String>,
    /// Campaigns whose name contains this substring are treated as having no
    /// keywords (their terms are never deduplicated away).
    pub campaign_name_excludes: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            spreadsheet_path: PathBuf::from("search_term_report.csv"),
            sheet_name: "Search Terms".to_string(),
            enable_classification: true,
            api_key_env: "GEMINI_API_KEY".to_string(),
            website_url: None,
            model: "gemini-2.0-flash".to_string(),
            batch_size: 10,
            batch_delay_ms: 2_000,
            cost_ceiling_usd: 5.0,
            pricing: default_pricing(),
            min_cost: 5.0,
            min_clicks: 3,
            min_conversions: 1.0,
            target: TargetRule {
                mode: TargetMode::Cpa,
                value: 50.0,
            },
            lookback_days: 1,
            window_days: 30,
            manual_start: None,
            manual_end: None,
            campaign_name_contains: None,
            campaign_name_excludes: None,
        }
    }
}

pub fn default_pricing() -> BTreeMap<String, ModelPricing> {
    let mut table = BTreeMap::new();
    table.insert(
        "gemini-2.0-flash".to_string(),
        ModelPricing {
            input_per_1k: 0.000_1,
            output_per_1k: 0.000_4,
        },
    );
    table.insert(
        "gemini-2.0-flash-lite".to_string(),
        ModelPricing {
            input_per_1k: 0.000_075,
            output_per_1k: 0.000_3,
        },
    );
    table.insert(
        "gemini-2.5-flash".to_string(),
        ModelPricing {
            input_per_1k: 0.000_3,
            output_per_1k: 0.002_5,
        },
    );
    table.insert(
        "gemini-1.5-pro".to_string(),
        ModelPricing {
            input_per_1k: 0.001_25,
            output_per_1k: 0.005,
        },
    );
    table
}
