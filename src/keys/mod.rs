// ABOUTME: Key aggregation module for building the lab's shared authorized_keys artifact
// ABOUTME: Re-exports the aggregator core and its error taxonomy

pub mod aggregator;

pub use aggregator::{AggregateError, KeyAggregator};
