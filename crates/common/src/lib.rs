//! `sq-common` — Shared types, configuration, and errors for the sequencing engine.
//!
//! This crate is the foundation the sequencing crate depends on:
//!
//! - **Types**: `SegmentId`, `Layout` (newtypes and enums for safety)
//! - **Config**: `SequencingConfig`, `BoundaryMode`
//! - **Errors**: `SequenceError`, `ConfigError` (thiserror-based)

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{BoundaryMode, SequencingConfig};
pub use error::{ConfigError, ConfigResult, SequenceError, SequenceResult};
pub use types::{Layout, SegmentId};
