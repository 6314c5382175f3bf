use dotenv::dotenv;
use search_term_auditor::llm::ClassificationOutcome;
use search_term_auditor::*;
use serde_json::json;
use std::error::Error;

/// Stands in for the advertising platform's keyword lookup. A real deployment
/// would answer these from the campaign's ad groups.
struct DemoKeywords;

impl KeywordSource for DemoKeywords {
    fn campaign_name(&self, _campaign_id: i64) -> error::Result<String> {
        Ok("Acme - Brand".to_string())
    }

    fn enabled_keywords(&self, _campaign_id: i64) -> error::Result<Vec<String>> {
        Ok(vec![
            "acme widgets".to_string(),
            "buy acme widgets".to_string(),
        ])
    }
}

fn sample_row(term: &str, cost_micros: i64, clicks: u64, conversions: f64, value: f64) -> serde_json::Value {
    json!({
        "search_term": term,
        "status": "NONE",
        "campaign_id": 1,
        "campaign_name": "Acme - Brand",
        "ad_group_id": 11,
        "ad_group_name": "Widgets - Exact",
        "impressions": clicks * 25,
        "clicks": clicks,
        "cost_micros": cost_micros,
        "conversions": conversions,
        "conversions_value": value
    })
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    println!("🔍 Search Term Audit Demonstration");
    println!("═══════════════════════════════════════════════\n");

    if std::env::var("GEMINI_API_KEY").is_err() {
        println!("⚠️  GEMINI_API_KEY is not set; the run will export without classifications.\n");
    }

    let mut config = ReportConfig::default();
    config.sheet_name = "Demo Audit".to_string();
    config.spreadsheet_path = "demo_search_term_report.csv".into();
    config.min_cost = 5.0;
    config.min_clicks = 3;
    config.min_conversions = 1.0;
    config.target = TargetRule {
        mode: TargetMode::Roas,
        value: 2.0,
    };

    let range = resolve_date_range(&config, chrono::Local::now().date_naive());
    let (start, end) = range.format_for_query();
    println!("📅 Reporting window: {} .. {}\n", start, end);

    // In production these rows come from the platform query for the window
    // above; the demo feeds a handful of hand-written ones instead.
    let rows = vec![
        sample_row("acme widgets", 12_000_000, 8, 3.0, 90.0), // existing keyword
        sample_row("wholesale widget supplier", 10_000_000, 6, 2.0, 40.0),
        sample_row("widget replacement parts", 15_000_000, 9, 3.0, 75.0),
        sample_row("free widgets", 1_000_000, 2, 0.0, 0.0), // under every floor
        sample_row("globex widgets", 11_000_000, 7, 2.0, 50.0),
    ];

    let outcome = run_audit(&config, rows, &DemoKeywords).await?;

    println!("📊 {} qualifying terms:", outcome.rows.len());
    for row in &outcome.rows {
        println!(
            "   {} (cost ${:.2}, ROAS {:.1}) → {} {}",
            row.search_term,
            row.cost,
            row.roas,
            if row.classification.is_empty() {
                "unclassified"
            } else {
                &row.classification
            },
            row.reasoning
        );
    }

    match &outcome.classification {
        ClassificationOutcome::Skipped { reason } => {
            println!("\n⏭️  Classification skipped: {}", reason);
        }
        ClassificationOutcome::Completed {
            batches,
            failed_batches,
            cost,
        } => {
            println!(
                "\n✅ Classified in {} batches ({} failed), actual spend ${:.4}",
                batches, failed_batches, cost.cost_usd
            );
        }
    }

    println!("💾 Report written to {}", outcome.export_path.display());
    Ok(())
}
