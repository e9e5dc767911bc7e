//! Analysis Module - Read-Only Queries over the Ingested Snapshot
//!
//! ## Structure
//! - `error`: `QueryError` - argument-contract violations, always returned
//!   as `Err`, never clamped or defaulted
//! - `engine`: `AnalyticsEngine` - dedup, ranking, windowing, heuristics

pub mod engine;
pub mod error;


pub use engine::AnalyticsEngine;
pub use error::QueryError;
