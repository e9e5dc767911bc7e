//! Ingest Module - Record Parsing & Source Coordination
//!
//! ## Structure
//! - `parser`: one delimited-text source -> typed events + line diagnostics
//! - `ingestor`: multi-source coordinator producing an `IngestionReport`
//!
//! ## Failure Strategy
//! Line-level failures never abort a source; they accumulate as diagnostics.
//! Only failing to read a source at all is fatal to that source, and even
//! that is isolated to a single source-level diagnostic.

pub mod ingestor;
pub mod parser;

#[cfg(test)]
mod tests;

pub use ingestor::{ErrorCategory, IngestionReport, LogIngestor};
pub use parser::{EventParser, ParseResult};
