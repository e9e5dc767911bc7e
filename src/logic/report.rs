//! Report Rendering - Console Summary & JSON Export
//!
//! Consumes the plain-data outputs of ingestion and analytics and renders
//! them for an operator. All formatting lives here; the engines never print.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::constants;
use crate::logic::analysis::AnalyticsEngine;
use crate::logic::ingest::IngestionReport;
use crate::logic::model::{Event, Referenceable};

fn fmt_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn fmt_event(event: &Event) -> String {
    format!(
        "{} {} -> {} @ {}",
        event.event_type().as_str(),
        event.subject().display_name(),
        event.object().display_name(),
        fmt_instant(event.timestamp())
    )
}

// ============================================================================
// INGESTION SUMMARY
// ============================================================================

pub fn print_ingestion_summary(report: &IngestionReport) {
    println!("Ingestion Summary:");
    println!("  Valid events: {}", report.events().len());
    println!("  Rejections: {}", report.errors().len());
    println!("  Processing time: {} ms", report.elapsed_ms());

    match (report.earliest_event_time(), report.latest_event_time()) {
        (Some(earliest), Some(latest)) => {
            println!(
                "  Time range: {} .. {}",
                fmt_instant(earliest),
                fmt_instant(latest)
            );
        }
        _ => println!("  Time range: (no events)"),
    }

    let breakdown = report.error_breakdown();
    if !breakdown.is_empty() {
        println!("  Rejection breakdown:");
        for (category, count) in &breakdown {
            println!("    {}: {}", category.as_str(), count);
        }
    }

    if !report.errors().is_empty() {
        println!();
        println!("All rejections:");
        for (i, error) in report.errors().iter().enumerate() {
            println!("  {}. {}", i + 1, error);
        }
    }
}

// ============================================================================
// ANALYTICS DIGEST
// ============================================================================

pub fn print_analytics(engine: &AnalyticsEngine, window: Option<(DateTime<Utc>, DateTime<Utc>)>) {
    println!();
    println!("Analytics:");

    // Counts per type, ordered by token for a stable report.
    let counts = engine.count_by_event_type();
    let mut by_token: Vec<(&str, u64)> = counts
        .iter()
        .map(|(t, count)| (t.as_str(), *count))
        .collect();
    by_token.sort_by(|a, b| a.0.cmp(b.0));
    println!("  Events by type:");
    for (token, count) in by_token {
        println!("    {}: {}", token, count);
    }

    let distinct = engine.unique_events().len();
    println!("  Distinct events: {}", distinct);

    if distinct > 0 {
        let k = constants::DEFAULT_TOP_K.min(distinct);
        match engine.top_k_frequent_events(k) {
            Ok(top) => {
                println!("  Top {} events by frequency:", k);
                for event in &top {
                    println!("    {}", fmt_event(event));
                }
            }
            Err(e) => log::error!("Frequency ranking failed: {}", e),
        }
    }

    if let Some((start, end)) = window {
        match engine.top_processes_by_window(start, end, constants::DEFAULT_PROCESS_LIMIT) {
            Ok(top) => {
                println!("  Top processes in range:");
                for (name, count) in &top {
                    println!("    {}: {}", name, count);
                }
            }
            Err(e) => log::error!("Process ranking failed: {}", e),
        }

        let threshold = constants::get_frequency_threshold();
        match engine.detect_high_frequency_processes(start, end, threshold) {
            Ok(flagged) if flagged.is_empty() => {
                println!("  High-frequency processes (>{}/min): none", threshold);
            }
            Ok(flagged) => {
                println!("  High-frequency processes (>{}/min):", threshold);
                for (name, count) in &flagged {
                    println!("    {}: {} events", name, count);
                }
            }
            Err(e) => log::error!("High-frequency detection failed: {}", e),
        }
    }

    match engine.detect_privilege_escalation(None, None) {
        Ok(escalations) if escalations.is_empty() => {
            println!("  Privilege escalations: none");
        }
        Ok(escalations) => {
            println!("  Privilege escalations (parent -> root child):");
            for (name, count) in &escalations {
                println!("    {}: {}", name, count);
            }
        }
        Err(e) => log::error!("Escalation detection failed: {}", e),
    }

    let sensitive_paths = constants::get_sensitive_paths();
    let hits = engine.find_sensitive_file_access(&sensitive_paths);
    if hits.is_empty() {
        println!("  Sensitive file accesses: none");
    } else {
        println!("  Sensitive file accesses: {}", hits.len());
        for event in &hits {
            println!("    {}", fmt_event(event));
        }
    }
}

// ============================================================================
// JSON EXPORT
// ============================================================================

/// Write the full ingestion report plus its category breakdown as one JSON
/// document.
pub fn export_json(report: &IngestionReport, target: &Path) -> io::Result<()> {
    let breakdown: serde_json::Map<String, serde_json::Value> = report
        .error_breakdown()
        .iter()
        .map(|(category, count)| {
            (
                category.as_str().to_string(),
                serde_json::Value::from(*count as u64),
            )
        })
        .collect();

    let document = serde_json::json!({
        "report": report,
        "error_breakdown": breakdown,
    });

    let mut file = File::create(target)?;
    serde_json::to_writer_pretty(&mut file, &document)?;
    file.write_all(b"\n")?;
    log::info!("Exported ingestion report to {}", target.display());
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
