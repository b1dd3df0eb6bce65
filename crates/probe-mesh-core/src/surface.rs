use log::debug;
use nalgebra::DMatrix;

use crate::{
    InterpolationMethod, Interpolator, QueryGrid, ResampleDensity, ResampleGridBuilder,
    Statistics, StatisticsError, SurfaceStatistics,
};

/// Dense surface handed to a renderer: query positions, heights and their
/// statistics.
#[derive(Clone, Debug)]
pub struct ResampledSurface {
    pub method: InterpolationMethod,
    pub density: ResampleDensity,
    pub query: QueryGrid,
    pub heights: DMatrix<f64>,
    pub statistics: Statistics,
}

impl ResampledSurface {
    /// Resample the interpolator's grid over its full extent.
    pub fn compute(
        interp: &Interpolator,
        density: ResampleDensity,
    ) -> Result<Self, StatisticsError> {
        let query = ResampleGridBuilder::build(interp.grid().extent(), density);
        let heights = interp.evaluate(&query);
        let statistics = SurfaceStatistics::compute(&heights)?;
        debug!(
            "resampled {}x{} grid to {}x{} ({}, density {})",
            interp.grid().nrows(),
            interp.grid().ncols(),
            heights.nrows(),
            heights.ncols(),
            interp.method(),
            density.get()
        );
        Ok(Self {
            method: interp.method(),
            density,
            query,
            heights,
            statistics,
        })
    }

    /// Heights as nested rows, row-major.
    pub fn height_rows(&self) -> Vec<Vec<f64>> {
        self.heights
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}
