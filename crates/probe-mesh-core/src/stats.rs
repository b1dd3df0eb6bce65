//! Summary statistics of a height matrix.

use std::fmt;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("cannot compute statistics of an empty height matrix")]
    EmptyInput,
}

/// Height summary of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// `max - min`, the usual flatness figure.
    pub peak_to_valley: f64,
}

/// Stateless statistics calculator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceStatistics;

impl SurfaceStatistics {
    pub fn compute(values: &DMatrix<f64>) -> Result<Statistics, StatisticsError> {
        Self::compute_values(values.as_slice())
    }

    pub fn compute_values(values: &[f64]) -> Result<Statistics, StatisticsError> {
        if values.is_empty() {
            return Err(StatisticsError::EmptyInput);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }

        if min == max {
            // Exact: summing then dividing may drift off a constant value.
            return Ok(Statistics {
                min,
                max,
                mean: min,
                std: 0.0,
                peak_to_valley: 0.0,
            });
        }

        // Work on values scaled into [-1, 1] so the sum cannot overflow and
        // the squared deviations cannot underflow to zero.
        let scale = min.abs().max(max.abs());
        let n = values.len() as f64;
        let mean_scaled = values.iter().map(|&v| v / scale).sum::<f64>() / n;
        let var_scaled = values
            .iter()
            .map(|&v| {
                let d = v / scale - mean_scaled;
                d * d
            })
            .sum::<f64>()
            / n;

        Ok(Statistics {
            min,
            max,
            mean: (mean_scaled * scale).clamp(min, max),
            std: var_scaled.sqrt() * scale,
            peak_to_valley: max - min,
        })
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Z max : {:.4}", self.max)?;
        writeln!(f, "Z min : {:.4}", self.min)?;
        writeln!(f, "Z mean: {:.4}", self.mean)?;
        writeln!(f, "Z std : {:.4}", self.std)?;
        write!(f, "Z P-V : {:.4}", self.peak_to_valley)
    }
}
