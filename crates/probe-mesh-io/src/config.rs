//! JSON run configuration and surface report.

use std::fs;
use std::path::{Path, PathBuf};

use probe_mesh_core::{
    AxisLayout, GridSample, InterpolationMethod, ResampleDensity, ResampledSurface, Statistics,
};
use serde::{Deserialize, Serialize};

use crate::{ProbeFormat, ProbeIoError, ValidationPolicy};

const DEFAULT_REPORT_PATH: &str = "probe_mesh_report.json";

/// Configuration for one resampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleConfig {
    pub input_path: String,
    #[serde(default)]
    pub method: InterpolationMethod,
    #[serde(default)]
    pub density: ResampleDensity,
    #[serde(default)]
    pub layout: AxisLayout,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Retry with linear interpolation when the grid is too small for the
    /// requested spline.
    #[serde(default)]
    pub fallback_to_linear: bool,
    #[serde(default)]
    pub validation: ValidationPolicy,
}

impl ResampleConfig {
    /// Config with defaults for everything but the input.
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            method: InterpolationMethod::default(),
            density: ResampleDensity::default(),
            layout: AxisLayout::default(),
            output_path: None,
            fallback_to_linear: false,
            validation: ValidationPolicy::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ProbeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ProbeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
    }
}

/// Result of a resampling run, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceReport {
    pub input_path: String,
    pub requested_method: InterpolationMethod,
    pub density: ResampleDensity,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
    /// `[rows, cols]` of the measured grid.
    #[serde(default)]
    pub source_shape: Option<[usize; 2]>,
    /// Method actually used, which differs from the request after a fallback.
    #[serde(default)]
    pub method: Option<InterpolationMethod>,
    #[serde(default)]
    pub source_statistics: Option<Statistics>,
    #[serde(default)]
    pub surface_statistics: Option<Statistics>,
    #[serde(default)]
    pub row_axis: Vec<f64>,
    #[serde(default)]
    pub col_axis: Vec<f64>,
    /// Resampled heights, row-major.
    #[serde(default)]
    pub heights: Vec<Vec<f64>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SurfaceReport {
    /// Empty report for `cfg`.
    pub fn new(cfg: &ResampleConfig) -> Self {
        Self {
            input_path: cfg.input_path.clone(),
            requested_method: cfg.method,
            density: cfg.density,
            format: None,
            source_shape: None,
            method: None,
            source_statistics: None,
            surface_statistics: None,
            row_axis: Vec::new(),
            col_axis: Vec::new(),
            heights: Vec::new(),
            error: None,
        }
    }

    /// Record the measured grid.
    pub fn set_source(&mut self, format: ProbeFormat, grid: &GridSample, stats: Statistics) {
        self.format = Some(format);
        self.source_shape = Some([grid.nrows(), grid.ncols()]);
        self.source_statistics = Some(stats);
    }

    /// Record the resampled surface.
    pub fn set_surface(&mut self, surface: &ResampledSurface) {
        self.method = Some(surface.method);
        self.density = surface.density;
        self.surface_statistics = Some(surface.statistics);
        self.row_axis = surface.query.row_axis().unwrap_or_default().to_vec();
        self.col_axis = surface.query.col_axis().unwrap_or_default().to_vec();
        self.heights = surface.height_rows();
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ProbeIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ProbeIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
