//! Height queries over a [`GridSample`].
//!
//! An [`Interpolator`] pairs a shared, immutable grid with one evaluation
//! kernel per [`InterpolationMethod`]. Points outside the sampled domain are
//! always extrapolated:
//!
//! - nearest snaps to the boundary sample,
//! - linear continues the boundary cell's slope,
//! - cubic/quintic continue the boundary polynomial piece.

mod lookup;
mod spline;

use std::fmt;
use std::sync::Arc;

use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{GridSample, InterpolationMethod, QueryGrid};
use lookup::{lerp, linear_cell, nearest_index};
use spline::TensorSpline;

/// Grid axis, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Col => f.write_str("column"),
        }
    }
}

/// Errors returned when building an [`Interpolator`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    /// The grid is too small along `axis` for the requested method. Callers
    /// may retry with a lower-order method.
    #[error("{method} interpolation needs at least {required} points along the {axis} axis, got {actual}")]
    InsufficientPoints {
        method: InterpolationMethod,
        axis: Axis,
        required: usize,
        actual: usize,
    },
    #[error("spline collocation system along the {axis} axis is singular")]
    SplineFit { axis: Axis },
}

#[derive(Clone, Debug)]
enum Kernel {
    Nearest,
    Linear,
    Spline(TensorSpline),
}

/// Interpolant over a measured grid.
///
/// Building is the only fallible step; evaluation never fails and never
/// mutates the interpolator or its grid.
#[derive(Clone, Debug)]
pub struct Interpolator {
    grid: Arc<GridSample>,
    method: InterpolationMethod,
    kernel: Kernel,
}

impl Interpolator {
    /// Prepare `method` over `grid`.
    ///
    /// Fails with [`InterpolateError::InsufficientPoints`] when either axis has
    /// fewer than `method.min_points()` samples.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(method = %method))
    )]
    pub fn build(
        grid: impl Into<Arc<GridSample>>,
        method: InterpolationMethod,
    ) -> Result<Self, InterpolateError> {
        let grid = grid.into();
        let required = method.min_points();
        for (axis, actual) in [(Axis::Row, grid.nrows()), (Axis::Col, grid.ncols())] {
            if actual < required {
                return Err(InterpolateError::InsufficientPoints {
                    method,
                    axis,
                    required,
                    actual,
                });
            }
        }

        let fit = |degree| {
            TensorSpline::fit(grid.row_coords(), grid.col_coords(), grid.values(), degree)
        };
        let kernel = match method {
            InterpolationMethod::Nearest => Kernel::Nearest,
            InterpolationMethod::Linear => Kernel::Linear,
            InterpolationMethod::Cubic => Kernel::Spline(fit(3)?),
            InterpolationMethod::Quintic => Kernel::Spline(fit(5)?),
        };

        debug!(
            "built {} interpolator over {}x{} grid",
            method,
            grid.nrows(),
            grid.ncols()
        );

        Ok(Self {
            grid,
            method,
            kernel,
        })
    }

    /// Build a fresh interpolator over the same grid with another method.
    pub fn with_method(&self, method: InterpolationMethod) -> Result<Self, InterpolateError> {
        Self::build(Arc::clone(&self.grid), method)
    }

    #[inline]
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    #[inline]
    pub fn grid(&self) -> &GridSample {
        &self.grid
    }

    /// Shared handle to the grid.
    #[inline]
    pub fn shared_grid(&self) -> Arc<GridSample> {
        Arc::clone(&self.grid)
    }

    /// Height at `(row, col)` in grid coordinates.
    pub fn sample(&self, row: f64, col: f64) -> f64 {
        let grid = &*self.grid;
        match &self.kernel {
            Kernel::Nearest => {
                let i = nearest_index(grid.row_coords(), row);
                let j = nearest_index(grid.col_coords(), col);
                grid.values()[(i, j)]
            }
            Kernel::Linear => {
                let (i, tr) = linear_cell(grid.row_coords(), row);
                let (j, tc) = linear_cell(grid.col_coords(), col);
                let v = grid.values();
                let top = lerp(v[(i, j)], v[(i, j + 1)], tc);
                let bottom = lerp(v[(i + 1, j)], v[(i + 1, j + 1)], tc);
                lerp(top, bottom, tr)
            }
            Kernel::Spline(spline) => spline.evaluate(row, col),
        }
    }

    /// One height per query point, in the shape of `points`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(method = %self.method, points = points.len()))
    )]
    pub fn evaluate(&self, points: &QueryGrid) -> DMatrix<f64> {
        DMatrix::from_row_iterator(
            points.nrows(),
            points.ncols(),
            points.points().iter().map(|p| self.sample(p.row, p.col)),
        )
    }
}
