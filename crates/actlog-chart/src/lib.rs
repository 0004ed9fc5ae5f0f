//! Chart rendering for actlog.
//!
//! Draws the aggregates produced by `actlog-data` as PNG images via the
//! `plotters` bitmap backend: frequency bars, the weekday distribution,
//! the time-of-day density curve, the per-kind hourly profile, and the
//! combined multi-panel figure.

pub mod combined;
pub mod day_hours;
pub mod density;
pub mod frequency;
pub mod render;
pub mod weekday;

pub use render::{render_chart, render_combined, ChartOptions};

use actlog_core::error::ActlogError;
use plotters::style::RGBColor;

/// Grey used for overlay lines (overall totals, means).
pub(crate) const GREY: RGBColor = RGBColor(128, 128, 128);

/// Map a drawing-backend error into the crate error type.
pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> ActlogError {
    ActlogError::ChartRender(e.to_string())
}
