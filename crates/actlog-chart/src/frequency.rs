//! Frequency-per-period bar chart, stacked by kind, with the repeat total
//! overlaid.

use std::collections::BTreeSet;

use actlog_core::error::{ActlogError, Result};
use actlog_core::models::Period;
use actlog_data::aggregator::FrequencyBucket;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{render_err, GREY};

/// Draw the frequency bar chart onto `area`.
///
/// One bar per bucket, segmented by kind (record counts stacked bottom-up),
/// with the repeat totals as a grey line with point markers.
pub fn draw_frequency<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    buckets: &[FrequencyBucket],
    period: Period,
) -> Result<()> {
    if buckets.is_empty() {
        return Err(ActlogError::NoData("no frequency buckets".to_string()));
    }

    let y_max = buckets
        .iter()
        .map(|b| b.repeats.max(u64::from(b.records)))
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let n = buckets.len();

    let mut chart = ChartBuilder::on(area)
        .caption("Frequency vs Time Period", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0..y_max * 1.1)
        .map_err(render_err)?;

    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 0.25 && idx >= 0.0 && (idx as usize) < keys.len() {
            keys[idx as usize].to_string()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(format!("Period ({})", period.label()))
        .y_desc("Frequency")
        .x_labels(n.min(12))
        .x_label_formatter(&label_for)
        .draw()
        .map_err(render_err)?;

    let kinds = kind_labels(buckets);
    if kinds.is_empty() {
        // Buckets built without kind detail fall back to plain bars.
        chart
            .draw_series(buckets.iter().enumerate().map(|(i, b)| {
                Rectangle::new(
                    [
                        (i as f64 - 0.35, 0.0),
                        (i as f64 + 0.35, f64::from(b.records)),
                    ],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(render_err)?
            .label("Records")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 4), (x + 10, y + 4)], BLUE.mix(0.6).filled())
            });
    } else {
        // Per-bucket running totals so each kind stacks on the last.
        let mut bases = vec![0u32; n];
        for (k_idx, kind) in kinds.iter().enumerate() {
            let color = Palette99::pick(k_idx);
            let mut segments = Vec::new();
            for (i, bucket) in buckets.iter().enumerate() {
                let count = bucket.kind_counts.get(kind).copied().unwrap_or(0);
                if count == 0 {
                    continue;
                }
                let y0 = f64::from(bases[i]);
                bases[i] += count;
                let y1 = f64::from(bases[i]);
                segments.push(Rectangle::new(
                    [(i as f64 - 0.35, y0), (i as f64 + 0.35, y1)],
                    color.mix(0.6).filled(),
                ));
            }
            chart
                .draw_series(segments)
                .map_err(render_err)?
                .label(kind.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.mix(0.6).filled())
                });
        }
    }

    chart
        .draw_series(LineSeries::new(
            buckets
                .iter()
                .enumerate()
                .map(|(i, b)| (i as f64, b.repeats as f64)),
            &GREY,
        ))
        .map_err(render_err)?
        .label("Overall")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREY));

    chart
        .draw_series(
            buckets
                .iter()
                .enumerate()
                .map(|(i, b)| Circle::new((i as f64, b.repeats as f64), 3, GREY.filled())),
        )
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}

/// Every kind named by the buckets, sorted, deduplicated.
fn kind_labels(buckets: &[FrequencyBucket]) -> Vec<String> {
    buckets
        .iter()
        .flat_map(|b| b.kind_counts.keys().map(String::as_str))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn bucket(key: &str, kinds: &[(&str, u32)], repeats: u64) -> FrequencyBucket {
        FrequencyBucket {
            key: key.to_string(),
            records: kinds.iter().map(|(_, c)| c).sum(),
            repeats,
            kind_counts: kinds
                .iter()
                .map(|(k, c)| (k.to_string(), *c))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_draw_frequency_empty_is_no_data() {
        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        let err = draw_frequency(&area, &[], Period::Month).unwrap_err();
        assert!(matches!(err, ActlogError::NoData(_)));
    }

    #[test]
    fn test_draw_frequency_stacked_kinds_smoke() {
        // Buckets with disjoint and overlapping kinds stack without error.
        let buckets = vec![
            bucket("2024-01", &[("solo", 2), ("paired", 1)], 5),
            bucket("2024-02", &[("solo", 1)], 1),
            bucket("2024-03", &[("paired", 2), ("unknown", 1)], 3),
        ];

        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        draw_frequency(&area, &buckets, Period::Month).unwrap();
    }

    #[test]
    fn test_draw_frequency_without_kind_detail_smoke() {
        let buckets = vec![
            FrequencyBucket {
                key: "2024-01".to_string(),
                records: 3,
                repeats: 5,
                kind_counts: Default::default(),
            },
            FrequencyBucket {
                key: "2024-02".to_string(),
                records: 1,
                repeats: 1,
                kind_counts: Default::default(),
            },
        ];

        let mut buffer = vec![0u8; 640 * 480 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (640, 480)).into_drawing_area();
        draw_frequency(&area, &buckets, Period::Month).unwrap();
    }

    #[test]
    fn test_kind_labels_sorted_and_deduplicated() {
        let buckets = vec![
            bucket("2024-01", &[("solo", 2), ("paired", 1)], 3),
            bucket("2024-02", &[("solo", 1), ("unknown", 1)], 2),
        ];
        assert_eq!(kind_labels(&buckets), vec!["paired", "solo", "unknown"]);
    }

    #[test]
    fn test_kind_labels_empty_for_plain_buckets() {
        let buckets = vec![FrequencyBucket {
            key: "2024-01".to_string(),
            records: 2,
            repeats: 2,
            kind_counts: Default::default(),
        }];
        assert!(kind_labels(&buckets).is_empty());
    }
}
