#![allow(dead_code)]

//! Analytics Engine - Dedup, Ranking, Windowing, Anomaly Heuristics
//!
//! Constructed once over an immutable event snapshot; every query is a pure
//! read. Deduplication is re-derived per call - the contract here is
//! correctness and determinism, not caching. Every ranked result defines a
//! total order (count descending, then an explicit ascending tie-break), so
//! identical input always produces identical output.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::logic::analysis::error::QueryError;
use crate::logic::model::event::{Event, EventType};

pub struct AnalyticsEngine {
    events: Vec<Event>,
}

impl AnalyticsEngine {
    /// Take ownership of the snapshot. Events are stored as ingested;
    /// duplicates are kept and matter for frequency queries.
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // ========================================================================
    // DEDUPLICATION
    // ========================================================================

    /// Structurally distinct events, first occurrence order preserved.
    pub fn unique_events(&self) -> Vec<Event> {
        dedup_in_order(self.events.iter())
    }

    /// Distinct events within the inclusive `[start, end]` window.
    pub fn unique_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, QueryError> {
        check_window(start, end)?;
        Ok(dedup_in_order(
            self.events.iter().filter(|e| in_window(e, start, end)),
        ))
    }

    // ========================================================================
    // FREQUENCY RANKING
    // ========================================================================

    /// Top-k events by occurrence count over the full (non-deduplicated)
    /// dataset. Ties break by ascending canonical key.
    pub fn top_k_frequent_events(&self, k: usize) -> Result<Vec<Event>, QueryError> {
        self.ranked_events(self.events.iter(), k)
    }

    /// Top-k restricted to the inclusive window; k is validated against the
    /// distinct population inside the window.
    pub fn top_k_frequent_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        k: usize,
    ) -> Result<Vec<Event>, QueryError> {
        check_window(start, end)?;
        self.ranked_events(self.events.iter().filter(|e| in_window(e, start, end)), k)
    }

    fn ranked_events<'a>(
        &self,
        scope: impl Iterator<Item = &'a Event>,
        k: usize,
    ) -> Result<Vec<Event>, QueryError> {
        if k == 0 {
            return Err(QueryError::NonPositiveArgument { name: "k" });
        }

        // Count in first-occurrence order so the later sort is fully
        // deterministic even when count and canonical key both tie.
        let mut index: HashMap<&Event, usize> = HashMap::new();
        let mut entries: Vec<(&Event, u64)> = Vec::new();
        for event in scope {
            match index.get(event) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(event, entries.len());
                    entries.push((event, 1));
                }
            }
        }

        if k > entries.len() {
            return Err(QueryError::CountExceedsPopulation {
                requested: k,
                available: entries.len(),
            });
        }

        let mut ranked: Vec<(u64, String, &Event)> = entries
            .into_iter()
            .map(|(event, count)| (count, event.canonical_key(), event))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        Ok(ranked.into_iter().take(k).map(|(_, _, e)| e.clone()).collect())
    }

    // ========================================================================
    // TYPE COUNTS
    // ========================================================================

    /// Occurrence count per event type; only types actually present appear.
    pub fn count_by_event_type(&self) -> HashMap<EventType, u64> {
        let mut counts = HashMap::new();
        for event in &self.events {
            *counts.entry(event.event_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Occurrence count of one type, 0 when absent.
    pub fn count_of_type(&self, event_type: EventType) -> u64 {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count() as u64
    }

    // ========================================================================
    // WINDOWED PROCESS RANKING
    // ========================================================================

    /// Events per subject process name within the inclusive window, ranked
    /// count descending then name ascending, truncated to `limit`.
    pub fn top_processes_by_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<(String, u64)>, QueryError> {
        check_window(start, end)?;
        if limit == 0 {
            return Err(QueryError::NonPositiveArgument { name: "limit" });
        }

        let mut ranked = ranked_process_counts(
            self.events.iter().filter(|e| in_window(e, start, end)),
            |e| e.subject().name(),
        );
        ranked.truncate(limit);
        Ok(ranked)
    }

    // ========================================================================
    // ANOMALY DETECTION
    // ========================================================================

    /// Forks where a non-root parent produced a root child, grouped by
    /// parent name. Both bounds absent means the whole dataset - this is the
    /// one windowed query where that is valid; a single absent bound is
    /// still an error.
    pub fn detect_privilege_escalation(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<(String, u64)>, QueryError> {
        let window = match (start, end) {
            (Some(s), Some(e)) => {
                check_window(s, e)?;
                Some((s, e))
            }
            (None, None) => None,
            _ => return Err(QueryError::MissingBound),
        };

        let escalations = self
            .events
            .iter()
            .filter(|e| match window {
                Some((s, end)) => in_window(e, s, end),
                None => true,
            })
            .filter(|e| {
                match (e.parent_process(), e.child_process()) {
                    (Some(parent), Some(child)) => !parent.is_root() && child.is_root(),
                    _ => false,
                }
            });

        Ok(ranked_process_counts(escalations, |e| {
            // Filter above guarantees this is a fork.
            e.subject().name()
        }))
    }

    /// Processes whose event count in the window strictly exceeds
    /// `ceil(threshold_per_minute x window_minutes)`. Zero-length windows
    /// are floored to one second of duration.
    pub fn detect_high_frequency_processes(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        threshold_per_minute: u64,
    ) -> Result<Vec<(String, u64)>, QueryError> {
        check_window(start, end)?;
        if threshold_per_minute == 0 {
            return Err(QueryError::NonPositiveArgument {
                name: "threshold_per_minute",
            });
        }

        let duration_seconds = (end - start).num_seconds();
        let mut duration_minutes = duration_seconds as f64 / 60.0;
        if duration_minutes <= 0.0 {
            duration_minutes = 1.0 / 60.0;
        }
        let threshold_for_window = (threshold_per_minute as f64 * duration_minutes).ceil() as u64;

        let mut ranked = ranked_process_counts(
            self.events.iter().filter(|e| in_window(e, start, end)),
            |e| e.subject().name(),
        );
        ranked.retain(|(_, count)| *count > threshold_for_window);
        Ok(ranked)
    }

    /// File-object events whose path equals one of the given paths or is
    /// related to one by whole-segment prefix containment in either
    /// direction: `/tmp` matches `/tmp/x` and `/tmp/x/y` matches a query for
    /// `/tmp/x/y/z`, but `/tmpfoo` never matches `/tmp`. An empty path set
    /// yields an empty result.
    pub fn find_sensitive_file_access(&self, sensitive_paths: &[String]) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.event_type().is_file_event())
            .filter(|e| {
                e.object().as_file().map_or(false, |file| {
                    sensitive_paths
                        .iter()
                        .any(|sensitive| paths_overlap(file.path(), sensitive))
                })
            })
            .cloned()
            .collect()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), QueryError> {
    if start > end {
        return Err(QueryError::InvalidWindow { start, end });
    }
    Ok(())
}

fn in_window(event: &Event, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    event.timestamp() >= start && event.timestamp() <= end
}

/// Segment-boundary prefix containment in both directions.
fn paths_overlap(event_path: &str, sensitive: &str) -> bool {
    event_path == sensitive
        || event_path.starts_with(&format!("{}/", sensitive))
        || sensitive.starts_with(&format!("{}/", event_path))
}

fn dedup_in_order<'a>(events: impl Iterator<Item = &'a Event>) -> Vec<Event> {
    let mut seen = std::collections::HashSet::new();
    events.filter(|e| seen.insert(*e)).cloned().collect()
}

/// Group events by a string key, then rank count descending / key ascending.
fn ranked_process_counts<'a, F>(
    events: impl Iterator<Item = &'a Event>,
    key: F,
) -> Vec<(String, u64)>
where
    F: Fn(&'a Event) -> &'a str,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for event in events {
        *counts.entry(key(event)).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
