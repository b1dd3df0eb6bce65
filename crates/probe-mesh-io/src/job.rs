use std::sync::Arc;

use log::{info, warn};
use probe_mesh_core::{
    InterpolateError, InterpolationMethod, Interpolator, ResampledSurface, StatisticsError,
    SurfaceStatistics,
};

use crate::{load_grid, LoadError, ResampleConfig, SurfaceReport};

#[derive(thiserror::Error, Debug)]
pub enum ResampleJobError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}

/// Load the configured file, resample it and fill a report.
///
/// With `fallback_to_linear`, a grid too small for a spline method is
/// resampled linearly instead of failing.
pub fn run_resample(cfg: &ResampleConfig) -> Result<SurfaceReport, ResampleJobError> {
    let loaded = load_grid(&cfg.input_path, &cfg.validation, cfg.layout)?;
    let source_stats = SurfaceStatistics::compute(loaded.grid.values())?;

    let mut report = SurfaceReport::new(cfg);
    report.set_source(loaded.format, &loaded.grid, source_stats);

    let grid = Arc::new(loaded.grid);
    let interp = match Interpolator::build(Arc::clone(&grid), cfg.method) {
        Ok(interp) => interp,
        Err(err @ InterpolateError::InsufficientPoints { .. }) if cfg.fallback_to_linear => {
            warn!("{err}; falling back to linear");
            Interpolator::build(grid, InterpolationMethod::Linear)?
        }
        Err(err) => return Err(err.into()),
    };

    let surface = ResampledSurface::compute(&interp, cfg.density)?;
    info!(
        "{}: {}x{} {} grid resampled to {}x{} with {}",
        cfg.input_path,
        interp.grid().nrows(),
        interp.grid().ncols(),
        loaded.format,
        surface.heights.nrows(),
        surface.heights.ncols(),
        surface.method
    );
    report.set_surface(&surface);
    Ok(report)
}
