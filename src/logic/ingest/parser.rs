//! Record Parser - Delimited Text to Typed Events
//!
//! Consumes one log source (comma-separated, 5 columns per record:
//! `type,timestamp,flags,subject,object`) and partitions it into accepted
//! events and per-line rejection diagnostics. Timestamps must be
//! non-decreasing relative to the last accepted event; rejected lines never
//! advance that cursor.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::logic::model::entity::{
    EntityError, FileInfo, NetworkInfo, Privilege, ProcessInfo, Protocol,
};
use crate::logic::model::event::{Event, EventType, ObjectInfo};

/// Columns per record: type, timestamp, flags, subject, object
const FIELD_COUNT: usize = 5;

// ============================================================================
// RESULT
// ============================================================================

/// Partitioned outcome of parsing one source. Both lists preserve line order.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub events: Vec<Event>,
    pub errors: Vec<String>,
}

// ============================================================================
// FIELD-LEVEL ERRORS
// ============================================================================

/// Malformed `key=value` segment inside a subject/object column.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KvError {
    Empty,
    MissingEquals(String),
    EmptyKey(String),
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Empty => write!(f, "Empty key=value data"),
            KvError::MissingEquals(segment) => {
                write!(f, "Malformed key=value pair (missing '='): {}", segment)
            }
            KvError::EmptyKey(segment) => {
                write!(f, "Empty key in key=value pair: {}", segment)
            }
        }
    }
}

/// Reason a subject or object column was rejected.
#[derive(Debug)]
enum FieldError {
    Kv(KvError),
    Entity(EntityError),
}

impl From<KvError> for FieldError {
    fn from(err: KvError) -> Self {
        FieldError::Kv(err)
    }
}

impl From<EntityError> for FieldError {
    fn from(err: EntityError) -> Self {
        FieldError::Entity(err)
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Kv(e) => e.fmt(f),
            FieldError::Entity(e) => e.fmt(f),
        }
    }
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one source file. An unreadable file is fatal to this source and
    /// surfaces as the `Err` case; everything else accumulates per line.
    pub fn parse_path(&self, path: &Path) -> io::Result<ParseResult> {
        log::debug!("Parsing source {}", path.display());
        let content = fs::read_to_string(path)?;
        Ok(self.parse_lines(content.lines()))
    }

    /// Parse a sequence of raw lines. Line numbers in diagnostics are 1-based.
    pub fn parse_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> ParseResult {
        let mut events: Vec<Event> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        let mut last_accepted: Option<DateTime<Utc>> = None;

        for (index, raw) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != FIELD_COUNT {
                errors.push(format!(
                    "Line {}: Expected {} fields, got {}",
                    line_number,
                    FIELD_COUNT,
                    fields.len()
                ));
                continue;
            }

            let type_token = fields[0].trim();
            let timestamp_raw = fields[1].trim();
            let flags = fields[2].trim();
            let subject_raw = fields[3].trim();
            let object_raw = fields[4].trim();

            let event_type = match EventType::parse_token(type_token) {
                Some(t) => t,
                None => {
                    errors.push(format!(
                        "Line {}: Invalid event type '{}'",
                        line_number, type_token
                    ));
                    continue;
                }
            };

            let timestamp = match DateTime::parse_from_rfc3339(timestamp_raw) {
                Ok(t) => t.with_timezone(&Utc),
                Err(_) => {
                    errors.push(format!(
                        "Line {}: Malformed timestamp '{}'",
                        line_number, timestamp_raw
                    ));
                    continue;
                }
            };

            // Order is checked against the last fully accepted event, not a
            // running maximum and not this line's own (possibly rejected)
            // siblings.
            if let Some(last) = last_accepted {
                if timestamp < last {
                    errors.push(format!(
                        "Line {}: Timestamp {} is before last accepted timestamp {}",
                        line_number,
                        fmt_instant(timestamp),
                        fmt_instant(last)
                    ));
                    continue;
                }
            }

            let subject = match parse_process(subject_raw) {
                Ok(p) => p,
                Err(reason) => {
                    errors.push(format!(
                        "Line {}: Invalid subject: {}",
                        line_number, reason
                    ));
                    continue;
                }
            };

            let object = match parse_object(event_type, object_raw) {
                Ok(o) => o,
                Err(reason) => {
                    errors.push(format!(
                        "Line {}: Invalid object for {} event: {}",
                        line_number,
                        event_type.as_str(),
                        reason
                    ));
                    continue;
                }
            };

            match Event::new(event_type, timestamp, subject, object, flags) {
                Ok(event) => {
                    last_accepted = Some(timestamp);
                    events.push(event);
                }
                Err(e) => {
                    errors.push(format!(
                        "Line {}: Invalid object for {} event: {}",
                        line_number,
                        event_type.as_str(),
                        e
                    ));
                }
            }
        }

        ParseResult { events, errors }
    }
}

fn fmt_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// ============================================================================
// COLUMN SUB-PARSERS
// ============================================================================

/// Split a `;`-separated `key=value` column into a map. Empty segments
/// (e.g. a trailing `;`) are ignored; segments without `=` or with an empty
/// key are rejected.
fn parse_key_values(data: &str) -> Result<HashMap<String, String>, KvError> {
    if data.trim().is_empty() {
        return Err(KvError::Empty);
    }

    let mut result = HashMap::new();
    for segment in data.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        let (key, value) = match segment.split_once('=') {
            Some(pair) => pair,
            None => return Err(KvError::MissingEquals(segment.to_string())),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(KvError::EmptyKey(segment.to_string()));
        }
        result.insert(key.to_string(), value.trim().to_string());
    }
    Ok(result)
}

fn require<'a>(
    fields: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, EntityError> {
    match fields.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(EntityError::MissingField(key)),
    }
}

fn parse_process(data: &str) -> Result<ProcessInfo, FieldError> {
    let fields = parse_key_values(data)?;

    let name = require(&fields, "name")?;
    let pid_raw = require(&fields, "pid")?;
    let path = require(&fields, "path")?;
    let privilege_raw = require(&fields, "privilege")?;

    let pid: i64 = pid_raw
        .parse()
        .map_err(|_| EntityError::InvalidPidFormat(pid_raw.to_string()))?;
    let privilege = Privilege::parse(privilege_raw)?;

    Ok(ProcessInfo::new(name, pid, path, privilege)?)
}

fn parse_file(data: &str) -> Result<FileInfo, FieldError> {
    let fields = parse_key_values(data)?;

    let path = require(&fields, "path")?;
    let fd_raw = require(&fields, "fd")?;
    let permissions = require(&fields, "permissions")?;

    let fd: i64 = fd_raw
        .parse()
        .map_err(|_| EntityError::InvalidFdFormat(fd_raw.to_string()))?;

    Ok(FileInfo::new(path, fd, permissions)?)
}

fn parse_network(data: &str) -> Result<NetworkInfo, FieldError> {
    let fields = parse_key_values(data)?;

    let ip = require(&fields, "ip")?;
    let port_raw = require(&fields, "port")?;
    let protocol_raw = require(&fields, "protocol")?;

    let port: i64 = port_raw
        .parse()
        .map_err(|_| EntityError::InvalidPortFormat(port_raw.to_string()))?;
    let protocol = Protocol::parse(protocol_raw)?;

    Ok(NetworkInfo::new(ip, port, protocol)?)
}

/// Parse the object column according to the already-resolved event type.
fn parse_object(event_type: EventType, data: &str) -> Result<ObjectInfo, FieldError> {
    if event_type.is_file_event() {
        Ok(ObjectInfo::File(parse_file(data)?))
    } else if event_type.is_network_event() {
        Ok(ObjectInfo::Network(parse_network(data)?))
    } else {
        Ok(ObjectInfo::Process(parse_process(data)?))
    }
}

// ============================================================================
// TESTS
// ============================================================================
