//! Day-of-week distribution bar chart.

use actlog_core::error::Result;
use actlog_data::aggregator::WeekdayDistribution;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::render_err;

/// Draw the Mon–Sun bar chart onto `area`.
pub fn draw_weekday<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    distribution: &WeekdayDistribution,
) -> Result<()> {
    let y_max = distribution.counts().iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Day of Week", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..6.5f64, 0.0..y_max * 1.1)
        .map_err(render_err)?;

    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 0.25 && (0.0..=6.0).contains(&idx) {
            WeekdayDistribution::LABELS[idx as usize].to_string()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Weekday")
        .y_desc("Frequency")
        .x_labels(7)
        .x_label_formatter(&label_for)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(distribution.counts().iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, f64::from(count))],
                GREEN.mix(0.6).filled(),
            )
        }))
        .map_err(render_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actlog_core::models::Record;
    use actlog_data::aggregator::Aggregator;
    use chrono::NaiveDate;

    #[test]
    fn test_draw_weekday_smoke() {
        let records = vec![Record {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            repeat: 1,
            kind: None,
        }];
        let distribution = Aggregator::weekday_distribution(&records);

        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        draw_weekday(&area, &distribution).unwrap();
    }

    #[test]
    fn test_draw_weekday_all_zero_still_renders() {
        // An all-zero distribution draws an empty axis rather than failing;
        // the empty-table guard lives in the render layer.
        let distribution = WeekdayDistribution::default();
        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        draw_weekday(&area, &distribution).unwrap();
    }
}
