//! Crop, fertilizer and yield advisory engine.
//!
//! Raw form fields are normalized into typed records and then run through
//! ordered rule tables. The HTTP service and CLI in `main.rs` are thin
//! adapters over the functions exported here.

pub mod advisory;
pub mod assistant;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod soil;
pub mod telemetry;
