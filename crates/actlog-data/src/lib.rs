//! Data layer for actlog.
//!
//! Responsible for reading delimited exports and plain activity logs into
//! [`Record`](actlog_core::models::Record) tables, and for deriving the
//! aggregates (frequency buckets, weekday distribution, time-of-day
//! densities) the chart layer draws.

pub mod aggregator;
pub mod density;
pub mod loader;

pub use actlog_core as core;
