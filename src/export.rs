use crate::error::{AuditError, Result};
use crate::schema::{ReportConfig, SearchTermRow};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

pub const REPORT_HEADERS: [&str; 13] = [
    "Search Term",
    "Status",
    "Campaign",
    "Ad Group",
    "Impressions",
    "Clicks",
    "Cost",
    "Conversions",
    "Conv. Value",
    "CPA",
    "ROAS",
    "Classification",
    "Reasoning",
];

/// The 13 export columns for one row, in header order.
pub fn spreadsheet_row(row: &SearchTermRow) -> [String; 13] {
    [
        row.search_term.clone(),
        row.status.as_str().to_string(),
        row.campaign_name.clone(),
        row.ad_group_name.clone(),
        row.impressions.to_string(),
        row.clicks.to_string(),
        format!("{:.2}", row.cost),
        format!("{:.2}", row.conversions),
        format!("{:.2}", row.conversion_value),
        format!("{:.2}", row.cpa),
        format!("{:.2}", row.roas),
        row.classification.clone(),
        row.reasoning.clone(),
    ]
}

/// Write the report to the configured target. On failure every row is dumped
/// to the log so the run's output survives somewhere, then the error is
/// returned to the caller; this is the run's one fatal failure mode.
pub fn export_report(rows: &[SearchTermRow], config: &ReportConfig) -> Result<PathBuf> {
    let target = resolve_target(config);
    match write_csv(rows, &target) {
        Ok(()) => {
            info!("Exported {} rows to {}", rows.len(), target.display());
            Ok(target)
        }
        Err(e) => {
            error!(
                "Export to {} failed: {}. Dumping report to the log",
                target.display(),
                e
            );
            dump_to_log(rows);
            Err(AuditError::Export {
                path: target.display().to_string(),
                source: Box::new(e),
            })
        }
    }
}

fn resolve_target(config: &ReportConfig) -> PathBuf {
    if config.spreadsheet_path.is_dir() {
        let file = format!("{}.csv", config.sheet_name.replace(['/', '\\'], "_"));
        config.spreadsheet_path.join(file)
    } else {
        config.spreadsheet_path.clone()
    }
}

fn write_csv(rows: &[SearchTermRow], target: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(target)?;
    writer.write_record(REPORT_HEADERS)?;
    for row in rows {
        writer.write_record(spreadsheet_row(row))?;
    }
    writer.flush()?;
    Ok(())
}

fn dump_to_log(rows: &[SearchTermRow]) {
    warn!("{}", REPORT_HEADERS.join("\t"));
    for row in rows {
        warn!("{}", spreadsheet_row(row).join("\t"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawSearchTermRow;

    fn sample_rows() -> Vec<SearchTermRow> {
        let mut first = RawSearchTermRow {
            search_term: Some("blue widgets".to_string()),
            status: Some("NONE".to_string()),
            campaign_name: Some("Brand".to_string()),
            ad_group_name: Some("Widgets".to_string()),
            impressions: Some(120),
            clicks: Some(6),
            cost_micros: Some(10_000_000),
            conversions: Some(2.0),
            conversions_value: Some(40.0),
            ..Default::default()
        }
        .resolve();
        first.classification = "RELEVANT".to_string();
        first.reasoning = "Matches the product line".to_string();

        let second = RawSearchTermRow {
            search_term: Some("free widgets, cheap".to_string()),
            status: Some("NONE".to_string()),
            ..Default::default()
        }
        .resolve();

        vec![first, second]
    }

    #[test]
    fn test_export_writes_13_columns() {
        let dir = std::env::temp_dir().join("search_term_auditor_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = ReportConfig::default();
        config.spreadsheet_path = dir.join("report.csv");
        config.sheet_name = "Search Terms".to_string();

        let rows = sample_rows();
        let path = export_report(&rows, &config).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 13);
        assert_eq!(&headers[0], "Search Term");
        assert_eq!(&headers[12], "Reasoning");

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "blue widgets");
        assert_eq!(&records[0][6], "10.00");
        assert_eq!(&records[0][11], "RELEVANT");
        // Commas inside a term survive the round trip.
        assert_eq!(&records[1][0], "free widgets, cheap");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_directory_target_uses_sheet_name() {
        let dir = std::env::temp_dir().join("search_term_auditor_dir_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = ReportConfig::default();
        config.spreadsheet_path = dir.clone();
        config.sheet_name = "June Audit".to_string();

        let path = export_report(&sample_rows(), &config).unwrap();
        assert_eq!(path, dir.join("June Audit.csv"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_failure_surfaces_error() {
        let mut config = ReportConfig::default();
        config.spreadsheet_path =
            PathBuf::from("/nonexistent-search-term-auditor/report.csv");

        let err = export_report(&sample_rows(), &config).unwrap_err();
        assert!(matches!(err, AuditError::Export { .. }));
    }
}
