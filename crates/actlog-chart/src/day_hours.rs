//! Per-kind activity over the hours of a day: scattered counts with an
//! overall mean line.

use actlog_core::error::{ActlogError, Result};
use actlog_data::aggregator::KindProfile;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{render_err, GREY};

/// Draw the hourly-profile chart onto `area`.
pub fn draw_day_hours<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    profiles: &[KindProfile],
    mean: &[(f64, f64)],
) -> Result<()> {
    if profiles.is_empty() {
        return Err(ActlogError::NoData("no hourly profile".to_string()));
    }

    let y_max = profiles
        .iter()
        .flat_map(|p| p.points.iter().map(|&(_, count)| count))
        .max()
        .unwrap_or(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Activities in a Day", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..24.5f64, 0.0..y_max + 1.0)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("O'Clock")
        .y_desc("Frequency")
        .x_labels(13)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(mean.iter().copied(), &GREY))
        .map_err(render_err)?
        .label("Mean")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREY));

    for (i, profile) in profiles.iter().enumerate() {
        let color = Palette99::pick(i);
        chart
            .draw_series(
                profile
                    .points
                    .iter()
                    .map(|&(clock, count)| Circle::new((clock, f64::from(count)), 4, color.filled())),
            )
            .map_err(render_err)?
            .label(&profile.kind)
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}
