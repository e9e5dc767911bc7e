#![allow(dead_code)]

//! Entity Types - Processes, Files, Network Endpoints
//!
//! Value types referenced by log events. Every entity validates its own
//! invariants at construction time, so an instance that exists is well-formed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION PATTERNS
// ============================================================================

/// Dotted-quad IPv4, each octet 0-255
static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("IPv4 pattern compiles")
});

/// Three-digit octal permission string (e.g. 644, 755)
static OCTAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-7]{3}$").expect("octal pattern compiles"));

// ============================================================================
// REFERENCEABLE
// ============================================================================

/// Anything an event can point at: a display string for reports and a stable
/// canonical id for deduplication and grouping keys.
pub trait Referenceable {
    fn display_name(&self) -> String;
    fn canonical_id(&self) -> String;
}

// ============================================================================
// ERRORS
// ============================================================================

/// Field-level validation failure for an entity constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    MissingField(&'static str),
    InvalidPidFormat(String),
    NonPositivePid(i64),
    InvalidFdFormat(String),
    NegativeFd(i64),
    InvalidPermissions(String),
    InvalidIpAddress(String),
    InvalidPortFormat(String),
    PortOutOfRange(i64),
    InvalidPrivilege(String),
    InvalidProtocol(String),
}

impl std::fmt::Display for EntityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityError::MissingField(field) => {
                write!(f, "Missing or empty '{}' field", field)
            }
            EntityError::InvalidPidFormat(raw) => write!(f, "Invalid PID format: {}", raw),
            EntityError::NonPositivePid(pid) => write!(f, "PID must be positive, got: {}", pid),
            EntityError::InvalidFdFormat(raw) => {
                write!(f, "Invalid file descriptor format: {}", raw)
            }
            EntityError::NegativeFd(fd) => {
                write!(f, "File descriptor must be non-negative, got: {}", fd)
            }
            EntityError::InvalidPermissions(raw) => {
                write!(f, "Permissions must be 3-digit octal format, got: {}", raw)
            }
            EntityError::InvalidIpAddress(raw) => {
                write!(f, "Invalid IPv4 address format: {}", raw)
            }
            EntityError::InvalidPortFormat(raw) => write!(f, "Invalid port format: {}", raw),
            EntityError::PortOutOfRange(port) => {
                write!(f, "Port must be between 1 and 65535, got: {}", port)
            }
            EntityError::InvalidPrivilege(raw) => {
                write!(f, "Privilege must be 'user' or 'root', got: {}", raw)
            }
            EntityError::InvalidProtocol(raw) => {
                write!(f, "Protocol must be TCP, UDP, or ICMP, got: {}", raw)
            }
        }
    }
}

impl std::error::Error for EntityError {}

// ============================================================================
// PRIVILEGE
// ============================================================================

/// Privilege level of a process. Stored literals are `user` / `root`,
/// matched case-sensitively on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Privilege {
    User,
    Root,
}

impl Privilege {
    pub fn parse(raw: &str) -> Result<Self, EntityError> {
        match raw {
            "user" => Ok(Privilege::User),
            "root" => Ok(Privilege::Root),
            _ => Err(EntityError::InvalidPrivilege(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::User => "user",
            Privilege::Root => "root",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Privilege::Root)
    }
}

// ============================================================================
// PROTOCOL
// ============================================================================

/// Transport protocol of a network endpoint. Input is case-insensitive,
/// stored normalized upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    pub fn parse(raw: &str) -> Result<Self, EntityError> {
        if raw.eq_ignore_ascii_case("tcp") {
            Ok(Protocol::Tcp)
        } else if raw.eq_ignore_ascii_case("udp") {
            Ok(Protocol::Udp)
        } else if raw.eq_ignore_ascii_case("icmp") {
            Ok(Protocol::Icmp)
        } else {
            Err(EntityError::InvalidProtocol(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
        }
    }
}

// ============================================================================
// PROCESS INFO
// ============================================================================

/// A process acting in, or acted upon by, an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessInfo {
    name: String,
    pid: i64,
    module_path: String,
    privilege: Privilege,
}

impl ProcessInfo {
    pub fn new(
        name: &str,
        pid: i64,
        module_path: &str,
        privilege: Privilege,
    ) -> Result<Self, EntityError> {
        if name.is_empty() {
            return Err(EntityError::MissingField("name"));
        }
        if module_path.is_empty() {
            return Err(EntityError::MissingField("path"));
        }
        if pid <= 0 {
            return Err(EntityError::NonPositivePid(pid));
        }
        Ok(Self {
            name: name.to_string(),
            pid,
            module_path: module_path.to_string(),
            privilege,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> i64 {
        self.pid
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    pub fn is_root(&self) -> bool {
        self.privilege.is_root()
    }
}

impl Referenceable for ProcessInfo {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn canonical_id(&self) -> String {
        format!("process:pid:{}", self.pid)
    }
}

// ============================================================================
// FILE INFO
// ============================================================================

/// A file or resource referenced by a file-operation event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileInfo {
    path: String,
    file_descriptor: i64,
    permissions: String,
}

impl FileInfo {
    pub fn new(path: &str, file_descriptor: i64, permissions: &str) -> Result<Self, EntityError> {
        if path.is_empty() {
            return Err(EntityError::MissingField("path"));
        }
        if file_descriptor < 0 {
            return Err(EntityError::NegativeFd(file_descriptor));
        }
        if !OCTAL_PATTERN.is_match(permissions) {
            return Err(EntityError::InvalidPermissions(permissions.to_string()));
        }
        Ok(Self {
            path: path.to_string(),
            file_descriptor,
            permissions: permissions.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_descriptor(&self) -> i64 {
        self.file_descriptor
    }

    pub fn permissions(&self) -> &str {
        &self.permissions
    }
}

impl Referenceable for FileInfo {
    fn display_name(&self) -> String {
        self.path.clone()
    }

    fn canonical_id(&self) -> String {
        format!("file:{}", self.path)
    }
}

// ============================================================================
// NETWORK INFO
// ============================================================================

/// A network endpoint referenced by sendto/receivefrom events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkInfo {
    ip_address: String,
    port: u16,
    protocol: Protocol,
}

impl NetworkInfo {
    pub fn new(ip_address: &str, port: i64, protocol: Protocol) -> Result<Self, EntityError> {
        if ip_address.is_empty() {
            return Err(EntityError::MissingField("ip"));
        }
        if !IPV4_PATTERN.is_match(ip_address) {
            return Err(EntityError::InvalidIpAddress(ip_address.to_string()));
        }
        if !(1..=65535).contains(&port) {
            return Err(EntityError::PortOutOfRange(port));
        }
        Ok(Self {
            ip_address: ip_address.to_string(),
            port: port as u16,
            protocol,
        })
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// `ip:port` pair without the protocol
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }
}

impl Referenceable for NetworkInfo {
    fn display_name(&self) -> String {
        format!("{} ({})", self.endpoint(), self.protocol.as_str())
    }

    fn canonical_id(&self) -> String {
        format!("network:{}:{}", self.endpoint(), self.protocol.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
