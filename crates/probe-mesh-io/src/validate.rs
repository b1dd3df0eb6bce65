use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Extra checks applied to loaded heights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Reject any `|z|` above this limit (e.g. `1.0` for a survey in inches).
    #[serde(default)]
    pub max_abs_height: Option<f64>,
}

/// Problems found in a height table. Positions are 0-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("height data is empty")]
    Empty,
    #[error("height data contains NaN at row {row}, column {col}")]
    NotANumber { row: usize, col: usize },
    #[error("height data contains an infinite value at row {row}, column {col}")]
    Infinite { row: usize, col: usize },
    #[error("height {value} at row {row}, column {col} exceeds the limit of {limit}")]
    OutOfRange {
        row: usize,
        col: usize,
        value: f64,
        limit: f64,
    },
    #[error("height grid is {rows}x{cols}, the minimum is 2x2")]
    TooSmall { rows: usize, cols: usize },
}

/// Check heights before they become a grid. Reports the first problem in
/// row-major order.
pub fn validate_heights(
    heights: &DMatrix<f64>,
    policy: &ValidationPolicy,
) -> Result<(), ValidationIssue> {
    if heights.is_empty() {
        return Err(ValidationIssue::Empty);
    }

    for (row, values) in heights.row_iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            if value.is_nan() {
                return Err(ValidationIssue::NotANumber { row, col });
            }
            if value.is_infinite() {
                return Err(ValidationIssue::Infinite { row, col });
            }
            if let Some(limit) = policy.max_abs_height {
                if value.abs() > limit {
                    return Err(ValidationIssue::OutOfRange {
                        row,
                        col,
                        value,
                        limit,
                    });
                }
            }
        }
    }

    if heights.nrows() < 2 || heights.ncols() < 2 {
        return Err(ValidationIssue::TooSmall {
            rows: heights.nrows(),
            cols: heights.ncols(),
        });
    }
    Ok(())
}
