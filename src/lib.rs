//! remedy - bulk remediation plan pipeline
//!
//! Packs large issue/system sets into bounded request batches, submits them
//! to a remediations backend with throttling and partial-failure tolerance,
//! and aggregates paginated collections with bounded concurrency.

pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod platform;
pub mod submit;
pub mod types;
