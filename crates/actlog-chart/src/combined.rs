//! Combined multi-panel figure: every chart as a subplot of one image.

use actlog_core::error::{ActlogError, Result};
use actlog_core::models::{Period, Record};
use actlog_data::aggregator::Aggregator;
use actlog_data::density::{kernel_density, GRID_POINTS};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::warn;

use crate::day_hours::draw_day_hours;
use crate::density::draw_density;
use crate::frequency::draw_frequency;
use crate::render_err;
use crate::weekday::draw_weekday;

/// Draw all charts as a 2×2 grid onto `root`.
///
/// A density panel that cannot be estimated (too few samples, zero spread)
/// is skipped with a warning; the other panels still draw.
pub fn draw_combined<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    records: &[Record],
    period: Period,
) -> Result<()> {
    if records.is_empty() {
        return Err(ActlogError::NoData("input table is empty".to_string()));
    }

    let title = format!("Activity Statistics ({} entries)", records.len());
    let root = root
        .titled(&title, ("sans-serif", 28))
        .map_err(render_err)?;
    let panels = root.split_evenly((2, 2));

    draw_frequency(&panels[0], &Aggregator::frequency(records, period), period)?;
    draw_weekday(&panels[1], &Aggregator::weekday_distribution(records))?;

    match kernel_density(&Aggregator::clock_samples(records), 0.0, 24.0, GRID_POINTS) {
        Ok(estimate) => draw_density(&panels[2], &estimate)?,
        Err(e) => warn!("Skipping density panel: {}", e),
    }

    let profiles = Aggregator::hourly_profile(records);
    let mean = Aggregator::mean_profile(&profiles);
    draw_day_hours(&panels[3], &profiles, &mean)?;

    Ok(())
}
