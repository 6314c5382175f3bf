use crate::error::{AuditError, Result};
use crate::schema::ReportConfig;
use chrono::{Duration, NaiveDate};
use log::warn;

/// Inclusive reporting window handed to the platform query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn format_for_query(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Manual start/end dates win when both parse and are ordered; anything wrong
/// with them falls back to the automatic window rather than failing the run.
pub fn resolve_date_range(config: &ReportConfig, today: NaiveDate) -> DateRange {
    if let (Some(start), Some(end)) = (&config.manual_start, &config.manual_end) {
        match parse_manual_range(start, end) {
            Ok(range) => return range,
            Err(e) => warn!("Manual date range rejected ({}); using automatic window", e),
        }
    }
    automatic_range(config, today)
}

fn automatic_range(config: &ReportConfig, today: NaiveDate) -> DateRange {
    let end = today - Duration::days(config.lookback_days.max(0));
    let window = config.window_days.max(1);
    let start = end - Duration::days(window - 1);
    DateRange { start, end }
}

fn parse_manual_range(start: &str, end: &str) -> Result<DateRange> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if end < start {
        return Err(AuditError::Date {
            value: format!("{}..{}", start, end),
            details: "end date precedes start date".to_string(),
        });
    }
    Ok(DateRange { start, end })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| AuditError::Date {
        value: value.to_string(),
        details: format!("{}. Expected YYYY-MM-DD", e),
    })
}
