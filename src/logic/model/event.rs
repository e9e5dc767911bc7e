#![allow(dead_code)]

//! Event Model - Normalized Host-Activity Events
//!
//! Immutable, timestamped records produced by the parser. An `Event` is one
//! closed record shape over eight operation types; the object slot is a sum
//! over the three entity kinds, constrained per operation type at
//! construction. Two events are the same occurrence iff all five fields
//! match exactly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{FileInfo, NetworkInfo, ProcessInfo, Referenceable};

// ============================================================================
// EVENT TYPE
// ============================================================================

/// The eight recognized host-activity operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Read,
    Write,
    Execute,
    Open,
    Close,
    Fork,
    SendTo,
    ReceiveFrom,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Read,
        EventType::Write,
        EventType::Execute,
        EventType::Open,
        EventType::Close,
        EventType::Fork,
        EventType::SendTo,
        EventType::ReceiveFrom,
    ];

    /// Resolve a wire token case-insensitively.
    pub fn parse_token(token: &str) -> Option<EventType> {
        match token.to_ascii_lowercase().as_str() {
            "read" => Some(EventType::Read),
            "write" => Some(EventType::Write),
            "execute" => Some(EventType::Execute),
            "open" => Some(EventType::Open),
            "close" => Some(EventType::Close),
            "fork" => Some(EventType::Fork),
            "sendto" => Some(EventType::SendTo),
            "receivefrom" => Some(EventType::ReceiveFrom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Read => "read",
            EventType::Write => "write",
            EventType::Execute => "execute",
            EventType::Open => "open",
            EventType::Close => "close",
            EventType::Fork => "fork",
            EventType::SendTo => "sendto",
            EventType::ReceiveFrom => "receivefrom",
        }
    }

    /// True for the operations whose object is a file.
    pub fn is_file_event(&self) -> bool {
        matches!(
            self,
            EventType::Read
                | EventType::Write
                | EventType::Execute
                | EventType::Open
                | EventType::Close
        )
    }

    /// True for the operations whose object is a network endpoint.
    pub fn is_network_event(&self) -> bool {
        matches!(self, EventType::SendTo | EventType::ReceiveFrom)
    }
}

// ============================================================================
// OBJECT INFO
// ============================================================================

/// The resource or process an event acts upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectInfo {
    File(FileInfo),
    Network(NetworkInfo),
    Process(ProcessInfo),
}

impl ObjectInfo {
    pub fn as_file(&self) -> Option<&FileInfo> {
        match self {
            ObjectInfo::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_network(&self) -> Option<&NetworkInfo> {
        match self {
            ObjectInfo::Network(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_process(&self) -> Option<&ProcessInfo> {
        match self {
            ObjectInfo::Process(p) => Some(p),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ObjectInfo::File(_) => "file",
            ObjectInfo::Network(_) => "network",
            ObjectInfo::Process(_) => "process",
        }
    }
}

impl Referenceable for ObjectInfo {
    fn display_name(&self) -> String {
        match self {
            ObjectInfo::File(f) => f.display_name(),
            ObjectInfo::Network(n) => n.display_name(),
            ObjectInfo::Process(p) => p.display_name(),
        }
    }

    fn canonical_id(&self) -> String {
        match self {
            ObjectInfo::File(f) => f.canonical_id(),
            ObjectInfo::Network(n) => n.canonical_id(),
            ObjectInfo::Process(p) => p.canonical_id(),
        }
    }
}

// ============================================================================
// OBJECT KIND ERROR
// ============================================================================

/// Raised when an event is constructed with an object of the wrong kind for
/// its operation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKindError {
    pub event_type: EventType,
    pub expected: &'static str,
    pub actual: &'static str,
}

impl std::fmt::Display for ObjectKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} event requires a {} object, got {}",
            self.event_type.as_str(),
            self.expected,
            self.actual
        )
    }
}

impl std::error::Error for ObjectKindError {}

// ============================================================================
// EVENT
// ============================================================================

/// One normalized log record. Constructed once by the parser, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    event_type: EventType,
    timestamp: DateTime<Utc>,
    subject: ProcessInfo,
    object: ObjectInfo,
    flags: String,
}

impl Event {
    /// Construct an event, enforcing the per-type object kind:
    /// file object for read/write/execute/open/close, network endpoint for
    /// sendto/receivefrom, process (the child) for fork.
    pub fn new(
        event_type: EventType,
        timestamp: DateTime<Utc>,
        subject: ProcessInfo,
        object: ObjectInfo,
        flags: &str,
    ) -> Result<Self, ObjectKindError> {
        let expected = if event_type.is_file_event() {
            "file"
        } else if event_type.is_network_event() {
            "network"
        } else {
            "process"
        };
        if object.kind() != expected {
            return Err(ObjectKindError {
                event_type,
                expected,
                actual: object.kind(),
            });
        }
        Ok(Self {
            event_type,
            timestamp,
            subject,
            object,
            flags: flags.to_string(),
        })
    }

    /// Fork convenience constructor: subject = parent, object = child.
    pub fn fork(
        timestamp: DateTime<Utc>,
        parent: ProcessInfo,
        child: ProcessInfo,
        flags: &str,
    ) -> Self {
        Self {
            event_type: EventType::Fork,
            timestamp,
            subject: parent,
            object: ObjectInfo::Process(child),
            flags: flags.to_string(),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn subject(&self) -> &ProcessInfo {
        &self.subject
    }

    pub fn object(&self) -> &ObjectInfo {
        &self.object
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Fork view: the parent process is the subject slot.
    pub fn parent_process(&self) -> Option<&ProcessInfo> {
        match self.event_type {
            EventType::Fork => Some(&self.subject),
            _ => None,
        }
    }

    /// Fork view: the child process is the object slot.
    pub fn child_process(&self) -> Option<&ProcessInfo> {
        match self.event_type {
            EventType::Fork => self.object.as_process(),
            _ => None,
        }
    }

    /// Deterministic total-ordering key for frequency tie-breaks.
    pub fn canonical_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.event_type.as_str(),
            self.subject.canonical_id(),
            self.object.canonical_id(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::entity::Privilege;
    use std::collections::HashSet;

    fn process(name: &str, pid: i64, privilege: Privilege) -> ProcessInfo {
        ProcessInfo::new(name, pid, "/bin/test", privilege).unwrap()
    }

    fn file(path: &str) -> FileInfo {
        FileInfo::new(path, 3, "644").unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse_token_case_insensitive() {
        assert_eq!(EventType::parse_token("read"), Some(EventType::Read));
        assert_eq!(EventType::parse_token("READ"), Some(EventType::Read));
        assert_eq!(EventType::parse_token("SendTo"), Some(EventType::SendTo));
        assert_eq!(EventType::parse_token("receivefrom"), Some(EventType::ReceiveFrom));
        assert_eq!(EventType::parse_token("delete"), None);
    }

    #[test]
    fn test_object_kind_enforced() {
        let subject = process("p", 1, Privilege::User);
        let wrong = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            subject.clone(),
            ObjectInfo::Process(process("q", 2, Privilege::User)),
            "",
        );
        let err = wrong.unwrap_err();
        assert_eq!(err.expected, "file");
        assert_eq!(err.actual, "process");

        let ok = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            subject,
            ObjectInfo::File(file("/tmp/a")),
            "mode=r",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_structural_equality_covers_all_fields() {
        let subject = process("p", 1, Privilege::User);
        let base = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            subject.clone(),
            ObjectInfo::File(file("/tmp/a")),
            "mode=r",
        )
        .unwrap();

        let same = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            subject.clone(),
            ObjectInfo::File(file("/tmp/a")),
            "mode=r",
        )
        .unwrap();
        assert_eq!(base, same);

        let other_flags = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            subject,
            ObjectInfo::File(file("/tmp/a")),
            "mode=rw",
        )
        .unwrap();
        assert_ne!(base, other_flags);

        let mut set = HashSet::new();
        set.insert(base.clone());
        assert!(set.contains(&same));
        assert!(!set.contains(&other_flags));
    }

    #[test]
    fn test_fork_parent_child_views() {
        let parent = process("launcher", 10, Privilege::User);
        let child = process("worker", 11, Privilege::Root);
        let ev = Event::fork(ts("2024-01-01T00:00:40Z"), parent.clone(), child.clone(), "");

        assert_eq!(ev.parent_process(), Some(&parent));
        assert_eq!(ev.child_process(), Some(&child));

        let read = Event::new(
            EventType::Read,
            ts("2024-01-01T00:00:00Z"),
            parent,
            ObjectInfo::File(file("/tmp/a")),
            "",
        )
        .unwrap();
        assert_eq!(read.parent_process(), None);
        assert_eq!(read.child_process(), None);
    }

    #[test]
    fn test_canonical_key_shape() {
        let ev = Event::new(
            EventType::Write,
            ts("2024-01-01T00:00:05Z"),
            process("p", 42, Privilege::User),
            ObjectInfo::File(file("/tmp/a")),
            "mode=w",
        )
        .unwrap();
        assert_eq!(
            ev.canonical_key(),
            "write|process:pid:42|file:/tmp/a|2024-01-01T00:00:05Z"
        );
    }
}
