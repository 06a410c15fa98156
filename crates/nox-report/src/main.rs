mod bootstrap;

use std::path::PathBuf;

use anyhow::Result;
use nox_core::config::PipelineConfig;
use nox_data::analysis::analyze;
use nox_ui::app::App;

fn main() -> Result<()> {
    bootstrap::setup_logging("info")?;

    tracing::info!("NOx report v{} starting", env!("CARGO_PKG_VERSION"));

    let cwd = std::env::current_dir()?;
    let data_dir = bootstrap::discover_data_path(&cwd).unwrap_or_else(|| PathBuf::from("."));
    let config = PipelineConfig::for_dir(&data_dir);
    tracing::info!(
        "Reading {:?} from {}",
        config.file_pattern,
        config.data_dir.display()
    );

    let result = analyze(&config)?;
    let meta = &result.metadata;
    tracing::info!(
        "Loaded {} files, {} rows ({} missing) in {:.3}s; aggregated in {:.3}s",
        meta.source_files.len(),
        meta.rows_loaded,
        meta.missing_readings,
        meta.load_time_seconds,
        meta.transform_time_seconds
    );
    tracing::debug!("Series: {}", result.series.to_json()?);

    let status = format!(
        "{} files · {} rows · {} missing",
        meta.source_files.len(),
        meta.rows_loaded,
        meta.missing_readings
    );
    App::new("auto", &result.series, &result.tables.yearly)
        .with_exceedance_threshold(config.exceedance_threshold)
        .with_status(status)
        .run()?;

    Ok(())
}
