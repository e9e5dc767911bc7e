use std::fs;
use std::path::PathBuf;

use super::ingestor::{ErrorCategory, LogIngestor};

const SUBJECT: &str = "name=proc;pid=100;path=/bin/proc;privilege=user";
const FILE_OBJ: &str = "path=/tmp/test.txt;fd=5;permissions=644";

fn record(event_type: &str, ts: &str) -> String {
    format!("{},{},flags,{},{}", event_type, ts, SUBJECT, FILE_OBJ)
}

fn write_source(dir: &tempfile::TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_ingest_merges_sources_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_source(
        &dir,
        "a.csv",
        &[
            record("read", "2024-01-01T00:00:01Z"),
            record("write", "2024-01-01T00:00:02Z"),
        ],
    );
    // Second source starts earlier than the first ended; ordering is only
    // enforced within a source, so this is fine.
    let second = write_source(&dir, "b.csv", &[record("open", "2024-01-01T00:00:00Z")]);

    let report = LogIngestor::new().ingest(&[first, second]);
    assert!(report.errors().is_empty());
    assert_eq!(report.events().len(), 3);

    let types: Vec<&str> = report
        .events()
        .iter()
        .map(|e| e.event_type().as_str())
        .collect();
    assert_eq!(types, vec!["read", "write", "open"]);
}

#[test]
fn test_missing_source_is_diagnosed_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let present = write_source(&dir, "a.csv", &[record("read", "2024-01-01T00:00:01Z")]);
    let absent = dir.path().join("nope.csv");

    let report = LogIngestor::new().ingest(&[absent.clone(), present]);
    assert_eq!(report.events().len(), 1);
    assert_eq!(report.errors().len(), 1);
    assert_eq!(
        report.errors()[0],
        format!("Missing file: {}", absent.display())
    );
    assert_eq!(
        report.error_breakdown().get(&ErrorCategory::MissingSource),
        Some(&1)
    );
}

#[test]
fn test_empty_source_skipped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    let full = write_source(&dir, "a.csv", &[record("read", "2024-01-01T00:00:01Z")]);

    let report = LogIngestor::new().ingest(&[empty, full]);
    assert!(report.errors().is_empty());
    assert_eq!(report.events().len(), 1);
}

#[test]
fn test_ingest_nothing_yields_empty_report() {
    let report = LogIngestor::new().ingest(&[]);
    assert!(report.events().is_empty());
    assert!(report.errors().is_empty());
    assert_eq!(report.earliest_event_time(), None);
    assert_eq!(report.latest_event_time(), None);
    assert!(report.error_breakdown().is_empty());
}

#[test]
fn test_report_time_range_spans_all_sources() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_source(&dir, "a.csv", &[record("read", "2024-01-01T00:05:00Z")]);
    let second = write_source(&dir, "b.csv", &[record("read", "2024-01-01T00:01:00Z")]);

    let report = LogIngestor::new().ingest(&[first, second]);
    assert_eq!(
        report.earliest_event_time().unwrap().to_rfc3339(),
        "2024-01-01T00:01:00+00:00"
    );
    assert_eq!(
        report.latest_event_time().unwrap().to_rfc3339(),
        "2024-01-01T00:05:00+00:00"
    );
}

#[test]
fn test_error_breakdown_counts_categories() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(
        &dir,
        "a.csv",
        &[
            record("read", "2024-01-01T00:00:05Z"),
            "too,few".to_string(),
            format!("bogus,2024-01-01T00:00:06Z,flags,{},{}", SUBJECT, FILE_OBJ),
            record("read", "not-a-time"),
            record("read", "2024-01-01T00:00:01Z"),
            format!(
                "read,2024-01-01T00:00:07Z,flags,name=proc;pid100;path=/bin/proc;privilege=user,{}",
                FILE_OBJ
            ),
            format!("read,2024-01-01T00:00:07Z,flags,name=;pid=9;path=/x;privilege=user,{}", FILE_OBJ),
            format!(
                "read,2024-01-01T00:00:07Z,flags,{},path=/tmp/x;fd=5;permissions=999",
                SUBJECT
            ),
        ],
    );

    let report = LogIngestor::new().ingest(&[source]);
    assert_eq!(report.events().len(), 1);

    let breakdown = report.error_breakdown();
    assert_eq!(breakdown.get(&ErrorCategory::RecordStructure), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::InvalidEventType), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::MalformedTimestamp), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::OutOfOrderTimestamp), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::MalformedKeyValue), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::InvalidSubject), Some(&1));
    assert_eq!(breakdown.get(&ErrorCategory::InvalidObject), Some(&1));
    assert_eq!(breakdown.values().sum::<usize>(), report.errors().len());
}

#[test]
fn test_classify_shapes() {
    assert_eq!(
        ErrorCategory::classify("Line 3: Expected 5 fields, got 4"),
        ErrorCategory::RecordStructure
    );
    assert_eq!(
        ErrorCategory::classify("Line 3: Invalid event type 'rm'"),
        ErrorCategory::InvalidEventType
    );
    assert_eq!(
        ErrorCategory::classify("Line 3: Malformed timestamp 'x'"),
        ErrorCategory::MalformedTimestamp
    );
    assert_eq!(
        ErrorCategory::classify(
            "Line 3: Timestamp 2024-01-01T00:00:01Z is before last accepted timestamp 2024-01-01T00:00:05Z"
        ),
        ErrorCategory::OutOfOrderTimestamp
    );
    // Key=value syntax wins over the subject/object wrapper it arrives in.
    assert_eq!(
        ErrorCategory::classify(
            "Line 3: Invalid subject: Malformed key=value pair (missing '='): pid100"
        ),
        ErrorCategory::MalformedKeyValue
    );
    assert_eq!(
        ErrorCategory::classify("Line 3: Invalid subject: Invalid PID format: abc"),
        ErrorCategory::InvalidSubject
    );
    assert_eq!(
        ErrorCategory::classify("Line 3: Invalid object for read event: Missing or empty 'fd' field"),
        ErrorCategory::InvalidObject
    );
    assert_eq!(
        ErrorCategory::classify("Missing file: data/a.csv"),
        ErrorCategory::MissingSource
    );
    assert_eq!(
        ErrorCategory::classify("Failed to read data/a.csv: permission denied"),
        ErrorCategory::SourceRead
    );
    assert_eq!(ErrorCategory::classify("something else"), ErrorCategory::Other);
}
