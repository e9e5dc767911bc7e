//! Model Module - Entity & Event Value Types
//!
//! ## Structure
//! - `entity`: `ProcessInfo`, `FileInfo`, `NetworkInfo` (self-validating)
//! - `event`: `EventType`, `ObjectInfo`, `Event`

pub mod entity;
pub mod event;

// Re-export main types for convenience
pub use entity::{EntityError, FileInfo, NetworkInfo, Privilege, ProcessInfo, Protocol, Referenceable};
pub use event::{Event, EventType, ObjectInfo};
