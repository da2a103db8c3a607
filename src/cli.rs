//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_chart::{MemoryChart, MemorySeries};
use crate::adapters::svg_chart::render_chart;
use crate::domain::attachment::IndicatorAttachment;
use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::indicator_config::{
    build_indicator_spec, build_render_config, validate_indicator_config,
};
use crate::ports::chart_port::SeriesSource;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "plotline", about = "Chart indicator calculator and renderer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute an indicator and write its derived series as CSV
    Compute {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        primary: PathBuf,
        #[arg(short, long)]
        secondary: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the base series and its indicator to SVG
    Render {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        primary: PathBuf,
        #[arg(short, long)]
        secondary: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate an indicator configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Compute {
            config,
            primary,
            secondary,
            output,
        } => run_compute(&config, &primary, secondary.as_deref(), output.as_deref()),
        Command::Render {
            config,
            primary,
            secondary,
            output,
        } => run_render(&config, &primary, secondary.as_deref(), &output),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PlotlineError> {
    FileConfigAdapter::from_file(path)
}

/// Reads a CSV series file through the data port: the directory is the
/// adapter's base and the file stem the series name.
pub fn load_series(path: &Path) -> Result<Vec<Bar>, PlotlineError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| PlotlineError::Data {
            reason: format!("not a series file: {}", path.display()),
        })?;
    let base = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    CsvAdapter::new(base).fetch_series(&name)
}

/// Attaches `spec` to an in-memory chart holding the given series and
/// returns the derived series it produces.
pub fn run_indicator(
    spec: IndicatorSpec,
    primary: Vec<Bar>,
    secondary: Option<Vec<Bar>>,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    let chart = Rc::new(MemoryChart::new());
    let base: Rc<dyn SeriesSource> = Rc::new(MemorySeries::new(primary));
    let other = secondary.map(|bars| Rc::new(MemorySeries::new(bars)) as Rc<dyn SeriesSource>);

    let attachment = IndicatorAttachment::new(spec);
    attachment.attach(chart, base, other)?;
    let points = attachment.indicator_series()?.data();
    attachment.detach();
    Ok(points)
}

fn load_inputs(
    primary: &Path,
    secondary: Option<&Path>,
) -> Result<(Vec<Bar>, Option<Vec<Bar>>), PlotlineError> {
    eprintln!("Loading series from {}", primary.display());
    let primary = load_series(primary)?;
    let secondary = match secondary {
        Some(path) => {
            eprintln!("Loading secondary series from {}", path.display());
            Some(load_series(path)?)
        }
        None => None,
    };
    Ok((primary, secondary))
}

pub fn run_compute(
    config_path: &Path,
    primary_path: &Path,
    secondary_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<(), PlotlineError> {
    let config = load_config(config_path)?;
    let spec = build_indicator_spec(&config)?;
    let (primary, secondary) = load_inputs(primary_path, secondary_path)?;

    eprintln!("Computing {spec} over {} bars", primary.len());
    let points = run_indicator(spec, primary, secondary)?;

    match output_path {
        Some(path) => {
            CsvAdapter::write_derived(path, &points)?;
            eprintln!("Wrote {} points to {}", points.len(), path.display());
        }
        None => CsvAdapter::write_points(io::stdout().lock(), &points)?,
    }
    Ok(())
}

pub fn run_render(
    config_path: &Path,
    primary_path: &Path,
    secondary_path: Option<&Path>,
    output_path: &Path,
) -> Result<(), PlotlineError> {
    let config = load_config(config_path)?;
    let spec = build_indicator_spec(&config)?;
    let render = build_render_config(&config)?;
    let (primary, secondary) = load_inputs(primary_path, secondary_path)?;

    let points = run_indicator(spec.clone(), primary.clone(), secondary)?;
    let svg = render_chart(&render, &spec, &primary, &points)?;
    fs::write(output_path, svg)?;
    eprintln!("Chart written to {}", output_path.display());
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), PlotlineError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_indicator_config(&config)?;
    let spec = build_indicator_spec(&config)?;
    build_render_config(&config)?;

    eprintln!("  Indicator: {spec}");
    if spec.kind().needs_secondary() {
        eprintln!("  Requires a secondary series (-s)");
    }
    eprintln!("\nIndicator configuration is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::WindowOptions;
    use tempfile::TempDir;

    #[test]
    fn load_series_splits_directory_and_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.csv");
        fs::write(&path, "time,close\n60,2\n0,1\n").unwrap();

        let bars = load_series(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, Some(1.0));
    }

    #[test]
    fn run_indicator_goes_through_attachment() {
        let bars: Vec<Bar> = (0..4).map(|i| Bar::single(i as f64, i as f64)).collect();
        let points =
            run_indicator(IndicatorSpec::Sma(WindowOptions::with_length(2)), bars, None).unwrap();
        let values: Vec<Option<f64>> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![None, Some(0.5), Some(1.5), Some(2.5)]);
    }

    #[test]
    fn run_indicator_reports_missing_secondary() {
        let spec = IndicatorSpec::default_for(crate::domain::indicator::IndicatorKind::Ratio);
        let err = run_indicator(spec, vec![Bar::single(0.0, 1.0)], None).unwrap_err();
        assert!(matches!(err, PlotlineError::Configuration { .. }));
    }
}
