//! Dense query grids for visualizing an interpolated surface.

use serde::{Deserialize, Serialize};

use crate::grid::GridExtent;

/// `n` evenly spaced values over `[start, stop]`, both ends included.
///
/// The last value is exactly `stop`. `n == 1` yields `[start]`, `n == 0` an
/// empty vector.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResampleError {
    #[error("resample density must be >= 1")]
    ZeroDensity,
}

/// Per-axis point multiplier for resampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ResampleDensity(u32);

impl ResampleDensity {
    pub const DEFAULT: ResampleDensity = ResampleDensity(10);

    pub fn new(value: u32) -> Result<Self, ResampleError> {
        if value == 0 {
            return Err(ResampleError::ZeroDensity);
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Resampled point count for an axis with `source_points` samples.
    ///
    /// Never less than two, so every axis keeps at least one segment.
    #[inline]
    pub fn points_for(self, source_points: usize) -> usize {
        (source_points as f64 * f64::from(self.0)).round().max(2.0) as usize
    }
}

impl Default for ResampleDensity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for ResampleDensity {
    type Error = ResampleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResampleDensity> for u32 {
    fn from(value: ResampleDensity) -> Self {
        value.0
    }
}

/// A query position in grid coordinates: `row` along the row axis, `col`
/// along the column axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub row: f64,
    pub col: f64,
}

impl QueryPoint {
    #[inline]
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryGridError {
    #[error("query grid {nrows}x{ncols} needs {expected} points, got {actual}")]
    ShapeMismatch {
        nrows: usize,
        ncols: usize,
        expected: usize,
        actual: usize,
    },
}

/// Rectangular array of query points, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryGrid {
    nrows: usize,
    ncols: usize,
    points: Vec<QueryPoint>,
    // Present when the grid is the outer product of two axes.
    axes: Option<(Vec<f64>, Vec<f64>)>,
}

impl QueryGrid {
    /// Wrap an arbitrary `nrows x ncols` array of points (row-major).
    pub fn new(nrows: usize, ncols: usize, points: Vec<QueryPoint>) -> Result<Self, QueryGridError> {
        let expected = nrows * ncols;
        if points.len() != expected {
            return Err(QueryGridError::ShapeMismatch {
                nrows,
                ncols,
                expected,
                actual: points.len(),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            points,
            axes: None,
        })
    }

    /// Outer product of a row axis and a column axis.
    pub fn from_axes(row_axis: Vec<f64>, col_axis: Vec<f64>) -> Self {
        let points = row_axis
            .iter()
            .flat_map(|&row| col_axis.iter().map(move |&col| QueryPoint::new(row, col)))
            .collect();
        Self {
            nrows: row_axis.len(),
            ncols: col_axis.len(),
            points,
            axes: Some((row_axis, col_axis)),
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in row-major order.
    #[inline]
    pub fn points(&self) -> &[QueryPoint] {
        &self.points
    }

    pub fn get(&self, row: usize, col: usize) -> Option<QueryPoint> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.points.get(row * self.ncols + col).copied()
    }

    /// Row axis positions, if the grid was built from axes.
    pub fn row_axis(&self) -> Option<&[f64]> {
        self.axes.as_ref().map(|(rows, _)| rows.as_slice())
    }

    /// Column axis positions, if the grid was built from axes.
    pub fn col_axis(&self) -> Option<&[f64]> {
        self.axes.as_ref().map(|(_, cols)| cols.as_slice())
    }
}

/// Builds the dense query grid used to display a resampled surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResampleGridBuilder;

impl ResampleGridBuilder {
    /// Query grid covering `[0, extent.rows] x [0, extent.cols]`.
    ///
    /// The row axis gets `density.points_for(extent.rows)` points and the
    /// column axis `density.points_for(extent.cols)` points.
    pub fn build(extent: GridExtent, density: ResampleDensity) -> QueryGrid {
        let row_axis = linspace(0.0, extent.rows as f64, density.points_for(extent.rows));
        let col_axis = linspace(0.0, extent.cols as f64, density.points_for(extent.cols));
        QueryGrid::from_axes(row_axis, col_axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(0.0, 3.0, 7);
        assert_eq!(v.len(), 7);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[6], 3.0);
        assert_relative_eq!(v[1], 0.5);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn builds_density_scaled_grid() {
        let grid = ResampleGridBuilder::build(
            GridExtent::new(2, 3),
            ResampleDensity::new(2).expect("density"),
        );
        // 4 column positions over [0, 2], 6 row positions over [0, 3].
        assert_eq!(grid.ncols(), 4);
        assert_eq!(grid.nrows(), 6);
        assert_eq!(grid.len(), 24);

        let cols = grid.col_axis().expect("axes");
        let rows = grid.row_axis().expect("axes");
        assert_eq!((cols[0], cols[3]), (0.0, 2.0));
        assert_eq!((rows[0], rows[5]), (0.0, 3.0));

        assert_eq!(grid.get(0, 0), Some(QueryPoint::new(0.0, 0.0)));
        assert_eq!(grid.get(5, 3), Some(QueryPoint::new(3.0, 2.0)));
        assert_eq!(grid.get(6, 0), None);
    }

    #[test]
    fn unit_density_keeps_at_least_one_segment() {
        let d = ResampleDensity::new(1).expect("density");
        assert_eq!(d.points_for(2), 2);
        assert_eq!(d.points_for(1), 2);
        assert_eq!(d.points_for(0), 2);

        let grid = ResampleGridBuilder::build(GridExtent::new(2, 2), d);
        assert_eq!(grid.shape(), (2, 2));
    }

    #[test]
    fn build_is_idempotent() {
        let extent = GridExtent::new(7, 13);
        let density = ResampleDensity::new(9).expect("density");
        let a = ResampleGridBuilder::build(extent, density);
        let b = ResampleGridBuilder::build(extent, density);
        assert_eq!(a.shape(), b.shape());
        for (p, q) in a.points().iter().zip(b.points()) {
            assert_eq!(p.row.to_bits(), q.row.to_bits());
            assert_eq!(p.col.to_bits(), q.col.to_bits());
        }
    }

    #[test]
    fn zero_density_is_rejected() {
        assert_eq!(ResampleDensity::new(0), Err(ResampleError::ZeroDensity));
        let parsed: Result<ResampleDensity, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: ResampleDensity = serde_json::from_str("4").expect("density");
        assert_eq!(parsed.get(), 4);
    }

    #[test]
    fn arbitrary_grid_checks_point_count() {
        let err = QueryGrid::new(2, 2, vec![QueryPoint::new(0.0, 0.0); 3]).unwrap_err();
        assert_eq!(
            err,
            QueryGridError::ShapeMismatch {
                nrows: 2,
                ncols: 2,
                expected: 4,
                actual: 3
            }
        );
        let grid = QueryGrid::new(1, 2, vec![QueryPoint::new(0.5, 1.5); 2]).expect("grid");
        assert!(grid.row_axis().is_none());
    }
}
