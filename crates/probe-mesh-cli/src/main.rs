mod args;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::info;
#[cfg(not(feature = "tracing"))]
use probe_mesh_core::init_with_level;
use probe_mesh_core::{ResampleDensity, ResampleError, StatisticsError, SurfaceStatistics};
use probe_mesh_io::{
    load_grid, load_heights, run_resample, save_heights, validate_heights, LoadError, ProbeIoError,
    ResampleConfig, ResampleJobError, SurfaceReport, ValidationIssue, ValidationPolicy,
};

use crate::args::{Cli, Command, ConvertArgs, ResampleArgs, StatsArgs};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Job(#[from] ResampleJobError),
    #[error(transparent)]
    Validation(#[from] ValidationIssue),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    #[error(transparent)]
    Density(#[from] ResampleError),
    #[error("{context}: {source}")]
    File {
        context: String,
        #[source]
        source: ProbeIoError,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    #[cfg(feature = "tracing")]
    probe_mesh_core::init_tracing(false, cli.log_level());
    #[cfg(not(feature = "tracing"))]
    {
        // Failing here only means a logger is already installed.
        let _ = init_with_level(cli.log_level());
    }

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("probe-mesh: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Stats(args) => stats(args),
        Command::Resample(args) => run_job(resample_config(args)?),
        Command::Convert(args) => convert(args),
        Command::Run { config } => {
            let cfg = ResampleConfig::load_json(&config).map_err(|source| CliError::File {
                context: format!("failed to load config {}", config.display()),
                source,
            })?;
            run_job(cfg)
        }
    }
}

fn stats(args: StatsArgs) -> Result<(), CliError> {
    let policy = ValidationPolicy {
        max_abs_height: args.max_abs,
    };
    let loaded = load_grid(&args.input, &policy, args.layout.into())?;
    let stats = SurfaceStatistics::compute(loaded.grid.values())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Source: {} ({})", args.input.display(), loaded.format);
    println!("X size: {} points", loaded.grid.ncols());
    println!("Y size: {} points", loaded.grid.nrows());
    println!("{stats}");
    Ok(())
}

fn resample_config(args: ResampleArgs) -> Result<ResampleConfig, CliError> {
    let mut cfg = ResampleConfig::new(args.input.to_string_lossy());
    cfg.method = args.method.into();
    cfg.density = ResampleDensity::new(args.density)?;
    cfg.layout = args.layout.into();
    cfg.fallback_to_linear = args.fallback;
    cfg.validation.max_abs_height = args.max_abs;
    cfg.output_path = args
        .output
        .map(|path| path.to_string_lossy().into_owned());
    Ok(cfg)
}

/// Resample, then write the report. A failed run still writes a report
/// carrying the error before returning it.
fn run_job(cfg: ResampleConfig) -> Result<(), CliError> {
    let out = cfg.output_path();
    match run_resample(&cfg) {
        Ok(report) => {
            write_report(&report, &out)?;
            if let Some(stats) = report.surface_statistics {
                println!("{stats}");
            }
            info!("report written to {}", out.display());
            Ok(())
        }
        Err(err) => {
            let mut report = SurfaceReport::new(&cfg);
            report.set_error(&err);
            write_report(&report, &out)?;
            Err(err.into())
        }
    }
}

fn write_report(report: &SurfaceReport, path: &Path) -> Result<(), CliError> {
    report.write_json(path).map_err(|source| CliError::File {
        context: format!("failed to write report {}", path.display()),
        source,
    })
}

fn convert(args: ConvertArgs) -> Result<(), CliError> {
    let loaded = load_heights(&args.input)?;
    validate_heights(&loaded.heights, &ValidationPolicy::default())?;

    let format = args.format.into();
    save_heights(&args.output, &loaded.heights, format).map_err(|source| CliError::File {
        context: format!("failed to write {}", args.output.display()),
        source,
    })?;
    info!(
        "{} ({}) -> {} ({format})",
        args.input.display(),
        loaded.format,
        args.output.display()
    );
    Ok(())
}
