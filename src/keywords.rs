use crate::error::Result;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Keyword inventory lookups, answered by the advertising platform.
pub trait KeywordSource {
    fn campaign_name(&self, campaign_id: i64) -> Result<String>;

    /// Enabled keyword texts across every ad group in the campaign.
    fn enabled_keywords(&self, campaign_id: i64) -> Result<Vec<String>>;
}

/// Per-campaign set of lowercased enabled keywords, built lazily on the first
/// query for a campaign and cached for the rest of the run. A campaign whose
/// name matches the exclusion substring, or whose fetch fails, is cached as
/// keyword-free so its terms stay eligible for the report.
pub struct CampaignKeywordIndex<'a, S: KeywordSource> {
    source: &'a S,
    exclude_filter: Option<String>,
    cache: HashMap<i64, HashSet<String>>,
}

impl<'a, S: KeywordSource> CampaignKeywordIndex<'a, S> {
    pub fn new(source: &'a S, exclude_filter: Option<&str>) -> Self {
        Self {
            source,
            exclude_filter: exclude_filter
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_lowercase),
            cache: HashMap::new(),
        }
    }

    pub fn is_keyword(&mut self, term: &str, campaign_id: i64) -> bool {
        if !self.cache.contains_key(&campaign_id) {
            let set = self.build_campaign_set(campaign_id);
            self.cache.insert(campaign_id, set);
        }
        self.cache[&campaign_id].contains(&term.to_lowercase())
    }

    pub fn cached_campaigns(&self) -> usize {
        self.cache.len()
    }

    fn build_campaign_set(&self, campaign_id: i64) -> HashSet<String> {
        match self.source.campaign_name(campaign_id) {
            Ok(name) => {
                if let Some(filter) = &self.exclude_filter {
                    if name.to_lowercase().contains(filter) {
                        debug!(
                            "Campaign {} ('{}') matches exclusion filter '{}'; skipping keyword dedup",
                            campaign_id, name, filter
                        );
                        return HashSet::new();
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Campaign name fetch failed for {}: {}. Treating campaign as keyword-free",
                    campaign_id, e
                );
                return HashSet::new();
            }
        }

        match self.source.enabled_keywords(campaign_id) {
            Ok(keywords) => {
                if keywords.is_empty() {
                    debug!("Campaign {} has no enabled keywords", campaign_id);
                }
                keywords.into_iter().map(|k| k.to_lowercase()).collect()
            }
            Err(e) => {
                warn!(
                    "Keyword fetch failed for campaign {}: {}. Treating campaign as keyword-free",
                    campaign_id, e
                );
                HashSet::new()
            }
        }
    }
}
