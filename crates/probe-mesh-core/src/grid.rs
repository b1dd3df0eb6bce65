//! Measured height grid.

use std::cmp::Ordering;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::resample::linspace;

/// How axis positions are generated for a bare height matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisLayout {
    /// Positions `0, 1, ..., n - 1`.
    Index,
    /// `n` evenly spaced positions spanning `[0, n]`.
    ///
    /// This matches the extent covered by [`crate::ResampleGridBuilder`], so a
    /// resampled surface stays inside the measured domain.
    #[default]
    Extent,
}

impl AxisLayout {
    /// Axis positions for an axis with `n` samples.
    pub fn positions(self, n: usize) -> Vec<f64> {
        match self {
            AxisLayout::Index => (0..n).map(|i| i as f64).collect(),
            AxisLayout::Extent => linspace(0.0, n as f64, n),
        }
    }
}

/// Point counts of a grid, in the `(cols, rows)` order used for resampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub cols: usize,
    pub rows: usize,
}

impl GridExtent {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

/// Grid construction errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridValidationError {
    #[error("grid needs at least 2 rows, got {0}")]
    TooFewRows(usize),
    #[error("grid needs at least 2 columns, got {0}")]
    TooFewCols(usize),
    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{axis} axis has {coords} coordinates but values have {values}")]
    AxisLengthMismatch {
        axis: &'static str,
        coords: usize,
        values: usize,
    },
    #[error("{axis} axis is not strictly increasing at index {index}")]
    NotStrictlyIncreasing { axis: &'static str, index: usize },
}

/// Immutable regular grid of probe heights.
///
/// `values[(i, j)]` is the height measured at `(row_coords[i], col_coords[j])`.
/// Axes need not be evenly spaced but are always strictly increasing and
/// hold at least two positions each.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSample {
    row_coords: Vec<f64>,
    col_coords: Vec<f64>,
    values: DMatrix<f64>,
}

impl GridSample {
    /// Validate and create a grid from explicit axes and a height matrix.
    pub fn new(
        row_coords: Vec<f64>,
        col_coords: Vec<f64>,
        values: DMatrix<f64>,
    ) -> Result<Self, GridValidationError> {
        if values.nrows() < 2 {
            return Err(GridValidationError::TooFewRows(values.nrows()));
        }
        if values.ncols() < 2 {
            return Err(GridValidationError::TooFewCols(values.ncols()));
        }
        if row_coords.len() != values.nrows() {
            return Err(GridValidationError::AxisLengthMismatch {
                axis: "row",
                coords: row_coords.len(),
                values: values.nrows(),
            });
        }
        if col_coords.len() != values.ncols() {
            return Err(GridValidationError::AxisLengthMismatch {
                axis: "column",
                coords: col_coords.len(),
                values: values.ncols(),
            });
        }
        check_increasing("row", &row_coords)?;
        check_increasing("column", &col_coords)?;

        Ok(Self {
            row_coords,
            col_coords,
            values,
        })
    }

    /// Create a grid from nested rows, rejecting ragged input.
    pub fn from_rows(
        row_coords: Vec<f64>,
        col_coords: Vec<f64>,
        rows: &[Vec<f64>],
    ) -> Result<Self, GridValidationError> {
        let values = matrix_from_rows(rows)?;
        Self::new(row_coords, col_coords, values)
    }

    /// Create a grid from a bare height matrix, generating both axes.
    pub fn from_heights(
        values: DMatrix<f64>,
        layout: AxisLayout,
    ) -> Result<Self, GridValidationError> {
        let row_coords = layout.positions(values.nrows());
        let col_coords = layout.positions(values.ncols());
        Self::new(row_coords, col_coords, values)
    }

    #[inline]
    pub fn row_coords(&self) -> &[f64] {
        &self.row_coords
    }

    #[inline]
    pub fn col_coords(&self) -> &[f64] {
        &self.col_coords
    }

    #[inline]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Point counts as `(cols, rows)`.
    pub fn extent(&self) -> GridExtent {
        GridExtent::new(self.ncols(), self.nrows())
    }
}

/// Build a matrix from nested rows.
///
/// Returns `TooFewRows(0)` for empty input and `RaggedRow` when widths differ.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, GridValidationError> {
    let Some(first) = rows.first() else {
        return Err(GridValidationError::TooFewRows(0));
    };
    let width = first.len();
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(GridValidationError::RaggedRow {
                row,
                expected: width,
                actual: values.len(),
            });
        }
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        width,
        rows.iter().flatten().copied(),
    ))
}

fn check_increasing(axis: &'static str, coords: &[f64]) -> Result<(), GridValidationError> {
    for (index, pair) in coords.windows(2).enumerate() {
        // NaN compares as `None` and fails too.
        if pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater) {
            return Err(GridValidationError::NotStrictlyIncreasing {
                axis,
                index: index + 1,
            });
        }
    }
    Ok(())
}
