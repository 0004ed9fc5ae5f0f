//! Shared foundation for actlog.
//!
//! Holds the record model, the error taxonomy, timestamp parsing and
//! timezone handling, and the CLI settings layer used by the binary.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;
