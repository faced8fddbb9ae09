// ABOUTME: Library root for labkeys, the lab authorized_keys aggregation component
// ABOUTME: Exposes the aggregator core, its configuration, and lab path conventions

pub mod config;
pub mod keys;
pub mod paths;

pub use config::{Config, KeysConfig};
pub use keys::{AggregateError, KeyAggregator};
pub use paths::LabPaths;
