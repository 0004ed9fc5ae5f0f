//! Time-of-day kernel density curve.

use actlog_core::error::Result;
use actlog_data::density::DensityEstimate;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::render_err;

/// Draw the KDE curve onto `area`.
pub fn draw_density<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    estimate: &DensityEstimate,
) -> Result<()> {
    let y_max = estimate.peak().max(f64::MIN_POSITIVE);

    let mut chart = ChartBuilder::on(area)
        .caption("Kernel Density Estimation", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..24.0, 0.0..y_max * 1.1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("O'Clock")
        .y_desc("Density")
        .x_labels(13)
        .draw()
        .map_err(render_err)?;

    let points: Vec<(f64, f64)> = estimate
        .grid
        .iter()
        .copied()
        .zip(estimate.density.iter().copied())
        .collect();

    chart
        .draw_series(AreaSeries::new(points.iter().copied(), 0.0, BLUE.mix(0.2)).border_style(BLUE))
        .map_err(render_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actlog_data::density::{kernel_density, GRID_POINTS};

    #[test]
    fn test_draw_density_smoke() {
        let estimate =
            kernel_density(&[8.0, 9.0, 21.0, 22.0], 0.0, 24.0, GRID_POINTS).unwrap();

        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        draw_density(&area, &estimate).unwrap();
    }
}
