use crate::schema::{ReportConfig, SearchTermRow, TargetMode, TargetRule};

/// Pure inclusion test for one resolved row. Terms the platform has already
/// acted on are out regardless of metrics; everything else must clear the
/// spend floors and then exactly one efficiency rule for the configured mode.
pub struct ThresholdFilter {
    min_cost: f64,
    min_clicks: u64,
    min_conversions: f64,
    target: TargetRule,
}

impl ThresholdFilter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            min_cost: config.min_cost,
            min_clicks: config.min_clicks,
            min_conversions: config.min_conversions,
            target: config.target,
        }
    }

    pub fn qualifies(&self, row: &SearchTermRow) -> bool {
        if row.status.already_actioned() {
            return false;
        }
        if row.cost < self.min_cost {
            return false;
        }
        if row.clicks < self.min_clicks {
            return false;
        }
        if row.conversions < self.min_conversions {
            return false;
        }
        match self.target.mode {
            TargetMode::Cpa => row.cpa <= self.target.value,
            TargetMode::Roas => row.roas >= self.target.value,
        }
    }
}
