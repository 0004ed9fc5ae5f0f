//! Top-level rendering: one PNG file per selected chart.

use std::path::PathBuf;

use actlog_core::error::{ActlogError, Result};
use actlog_core::models::{ChartKind, Period, Record};
use actlog_data::aggregator::Aggregator;
use actlog_data::density::{kernel_density, GRID_POINTS};
use plotters::prelude::*;
use tracing::{info, warn};

use crate::combined::draw_combined;
use crate::day_hours::draw_day_hours;
use crate::density::draw_density;
use crate::frequency::draw_frequency;
use crate::render_err;
use crate::weekday::draw_weekday;

/// Output options for rendered charts.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Directory the PNG files are written into (created if absent).
    pub output_dir: PathBuf,
    /// Image size in pixels.
    pub size: (u32, u32),
    /// Bucket size for the frequency chart.
    pub period: Period,
}

/// Render the selected chart(s) and return the paths written.
///
/// `ChartKind::All` renders every chart as its own file; a chart that
/// cannot render (e.g. a density estimate without enough samples) is
/// skipped with a warning while the rest still render. A single chart
/// that fails is an error.
pub fn render_chart(kind: ChartKind, records: &[Record], opts: &ChartOptions) -> Result<Vec<PathBuf>> {
    if records.is_empty() {
        return Err(ActlogError::NoData("input table is empty".to_string()));
    }
    std::fs::create_dir_all(&opts.output_dir)?;

    match kind {
        ChartKind::All => {
            let mut written = Vec::new();
            for single in [ChartKind::Freq, ChartKind::Day, ChartKind::Kde, ChartKind::Hours] {
                match render_single(single, records, opts) {
                    Ok(path) => written.push(path),
                    Err(e) => warn!("Skipping {} chart: {}", file_stem(single), e),
                }
            }
            Ok(written)
        }
        single => Ok(vec![render_single(single, records, opts)?]),
    }
}

/// Render the combined 2×2 figure and return its path.
pub fn render_combined(records: &[Record], opts: &ChartOptions) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(ActlogError::NoData("input table is empty".to_string()));
    }
    std::fs::create_dir_all(&opts.output_dir)?;

    let path = opts.output_dir.join("combined.png");
    {
        let root = BitMapBackend::new(&path, opts.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        draw_combined(&root, records, opts.period)?;
        root.present().map_err(render_err)?;
    }
    info!("Wrote {}", path.display());
    Ok(path)
}

// ── Internal ──────────────────────────────────────────────────────────────────

fn render_single(kind: ChartKind, records: &[Record], opts: &ChartOptions) -> Result<PathBuf> {
    // Estimate the density before opening the backend so a failed estimate
    // leaves no file behind.
    let estimate = match kind {
        ChartKind::Kde => Some(kernel_density(
            &Aggregator::clock_samples(records),
            0.0,
            24.0,
            GRID_POINTS,
        )?),
        _ => None,
    };

    let path = opts.output_dir.join(format!("{}.png", file_stem(kind)));
    {
        let root = BitMapBackend::new(&path, opts.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        match kind {
            ChartKind::Freq => {
                let buckets = Aggregator::frequency(records, opts.period);
                draw_frequency(&root, &buckets, opts.period)?;
            }
            ChartKind::Day => {
                draw_weekday(&root, &Aggregator::weekday_distribution(records))?;
            }
            ChartKind::Kde => {
                // Guarded above.
                if let Some(estimate) = &estimate {
                    draw_density(&root, estimate)?;
                }
            }
            ChartKind::Hours => {
                let profiles = Aggregator::hourly_profile(records);
                let mean = Aggregator::mean_profile(&profiles);
                draw_day_hours(&root, &profiles, &mean)?;
            }
            ChartKind::All => unreachable!("handled by render_chart"),
        }

        root.present().map_err(render_err)?;
    }
    info!("Wrote {}", path.display());
    Ok(path)
}

fn file_stem(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Freq => "frequency",
        ChartKind::Day => "weekday",
        ChartKind::Kde => "density",
        ChartKind::Hours => "day_hours",
        ChartKind::All => "all",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(d: u32, h: u32, min: u32, kind: Option<&str>) -> Record {
        Record {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
            repeat: 1,
            kind: kind.map(str::to_string),
        }
    }

    fn sample_records() -> Vec<Record> {
        vec![
            record(15, 8, 30, Some("solo")),
            record(16, 21, 0, Some("solo")),
            record(17, 22, 15, Some("paired")),
            record(18, 7, 45, None),
        ]
    }

    fn opts(dir: &TempDir) -> ChartOptions {
        ChartOptions {
            output_dir: dir.path().to_path_buf(),
            size: (640, 480),
            period: Period::Day,
        }
    }

    #[test]
    fn test_render_chart_empty_table_is_no_data() {
        let dir = TempDir::new().unwrap();
        let err = render_chart(ChartKind::Freq, &[], &opts(&dir)).unwrap_err();
        assert!(matches!(err, ActlogError::NoData(_)));
    }

    #[test]
    fn test_render_combined_empty_table_is_no_data() {
        let dir = TempDir::new().unwrap();
        let err = render_combined(&[], &opts(&dir)).unwrap_err();
        assert!(matches!(err, ActlogError::NoData(_)));
    }

    #[test]
    fn test_render_single_chart_writes_file() {
        let dir = TempDir::new().unwrap();
        let written = render_chart(ChartKind::Day, &sample_records(), &opts(&dir)).unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(written[0], dir.path().join("weekday.png"));
        assert!(written[0].exists());
    }

    #[test]
    fn test_render_all_writes_every_chart() {
        let dir = TempDir::new().unwrap();
        let written = render_chart(ChartKind::All, &sample_records(), &opts(&dir)).unwrap();

        assert_eq!(written.len(), 4);
        for stem in ["frequency", "weekday", "density", "day_hours"] {
            assert!(dir.path().join(format!("{}.png", stem)).exists(), "{}", stem);
        }
    }

    #[test]
    fn test_render_all_skips_unestimable_density() {
        // Both records quantise to the same hour: no spread for the KDE.
        let records = vec![record(15, 8, 0, None), record(16, 8, 5, None)];

        let dir = TempDir::new().unwrap();
        let written = render_chart(ChartKind::All, &records, &opts(&dir)).unwrap();

        assert_eq!(written.len(), 3);
        assert!(!dir.path().join("density.png").exists());
    }

    #[test]
    fn test_render_single_kde_without_spread_is_error() {
        let records = vec![record(15, 8, 0, None), record(16, 8, 5, None)];

        let dir = TempDir::new().unwrap();
        let err = render_chart(ChartKind::Kde, &records, &opts(&dir)).unwrap_err();
        assert!(matches!(err, ActlogError::InsufficientData(_)));
        assert!(!dir.path().join("density.png").exists());
    }

    #[test]
    fn test_render_combined_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = render_combined(&sample_records(), &opts(&dir)).unwrap();
        assert_eq!(path, dir.path().join("combined.png"));
        assert!(path.exists());
    }
}
