use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use probe_mesh_core::{AxisLayout, InterpolationMethod};
use probe_mesh_io::ProbeFormat;

#[derive(Parser, Debug)]
#[command(name = "probe-mesh", version)]
#[command(about = "Resample and summarize probe height meshes")]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print height statistics of a probe file
    Stats(StatsArgs),
    /// Interpolate a probe file onto a denser grid and write a JSON report
    Resample(ResampleArgs),
    /// Rewrite a probe file in another format
    Convert(ConvertArgs),
    /// Resample as described by a JSON config file
    Run {
        /// Path to the JSON config
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Probe data file
    pub input: PathBuf,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_enum, default_value_t = LayoutArg::Extent)]
    pub layout: LayoutArg,

    /// Reject heights whose magnitude exceeds this value
    #[arg(long)]
    pub max_abs: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ResampleArgs {
    /// Probe data file
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = MethodArg::Nearest)]
    pub method: MethodArg,

    /// Points per source point along each axis
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub density: u32,

    /// How axis positions are assigned to the measured samples
    #[arg(long, value_enum, default_value_t = LayoutArg::Extent)]
    pub layout: LayoutArg,

    /// Use linear interpolation when the grid is too small for a spline
    #[arg(long)]
    pub fallback: bool,

    /// Reject heights whose magnitude exceeds this value
    #[arg(long)]
    pub max_abs: Option<f64>,

    /// Report path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Probe data file
    pub input: PathBuf,

    /// Destination file
    pub output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Custom)]
    pub format: FormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    Nearest,
    Linear,
    Cubic,
    Quintic,
}

impl From<MethodArg> for InterpolationMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Nearest => InterpolationMethod::Nearest,
            MethodArg::Linear => InterpolationMethod::Linear,
            MethodArg::Cubic => InterpolationMethod::Cubic,
            MethodArg::Quintic => InterpolationMethod::Quintic,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutArg {
    Index,
    Extent,
}

impl From<LayoutArg> for AxisLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Index => AxisLayout::Index,
            LayoutArg::Extent => AxisLayout::Extent,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Custom,
    Csv,
    Whitespace,
}

impl From<FormatArg> for ProbeFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Custom => ProbeFormat::Custom,
            FormatArg::Csv => ProbeFormat::Csv,
            FormatArg::Whitespace => ProbeFormat::Whitespace,
        }
    }
}
