mod bootstrap;

use anyhow::Result;
use actlog_chart::{render_chart, render_combined, ChartOptions};
use actlog_core::models::ChartKind;
use actlog_core::settings::Settings;
use actlog_core::time_utils::TimestampParser;
use actlog_data::loader::load_records;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Actlog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Period: {}, Output: {}",
        settings.file.display(),
        settings.period,
        settings.output.display()
    );

    let size = settings.image_size()?;
    let parser = TimestampParser::new(&settings.timezone);

    let records = load_records(&settings.file, &parser, settings.skip_invalid)?;
    tracing::info!("Loaded {} records", records.len());

    let opts = ChartOptions {
        output_dir: settings.output.clone(),
        size,
        period: settings.period,
    };

    let written = if settings.all {
        vec![render_combined(&records, &opts)?]
    } else {
        render_chart(settings.chart.unwrap_or(ChartKind::All), &records, &opts)?
    };

    for path in &written {
        println!("Chart written: {}", path.display());
    }

    Ok(())
}
