//! Tensor-product interpolating B-splines.
//!
//! Each axis gets a not-a-knot knot vector: the sample coordinates with
//! `(k - 1) / 2 + 1` of them dropped at each end, plus `k + 1` copies of each
//! end coordinate. The coefficient matrix solves the collocation system along
//! rows and then along columns. Evaluation runs the Cox-de Boor recurrence on
//! a span clamped to the first/last polynomial piece, so points outside the
//! domain continue the boundary polynomial.

use nalgebra::DMatrix;

use super::{Axis, InterpolateError};

/// Largest supported spline order (quintic, `k + 1`).
const MAX_ORDER: usize = 6;

/// Knot vector and degree of one axis.
#[derive(Clone, Debug)]
pub(crate) struct AxisBasis {
    knots: Vec<f64>,
    degree: usize,
    n: usize,
}

impl AxisBasis {
    /// Not-a-knot basis for `coords` (odd `degree`, `coords.len() > degree`).
    pub(crate) fn not_a_knot(coords: &[f64], degree: usize) -> Self {
        debug_assert!(degree % 2 == 1 && degree < MAX_ORDER);
        debug_assert!(coords.len() > degree);

        let n = coords.len();
        let skip = (degree - 1) / 2 + 1;
        let mut knots = Vec::with_capacity(n + degree + 1);
        knots.extend(std::iter::repeat_n(coords[0], degree + 1));
        knots.extend_from_slice(&coords[skip..n - skip]);
        knots.extend(std::iter::repeat_n(coords[n - 1], degree + 1));
        debug_assert_eq!(knots.len(), n + degree + 1);

        Self { knots, degree, n }
    }

    /// Span index `l` with `knots[l] <= x < knots[l + 1]`, clamped to
    /// `degree..=n - 1`.
    #[inline]
    fn span(&self, x: f64) -> usize {
        self.knots
            .partition_point(|&t| t <= x)
            .saturating_sub(1)
            .clamp(self.degree, self.n - 1)
    }

    /// Index of the first non-zero basis function at `x` and the `degree + 1`
    /// values starting there.
    pub(crate) fn basis(&self, x: f64) -> (usize, [f64; MAX_ORDER]) {
        let k = self.degree;
        let l = self.span(x);
        let t = &self.knots;

        let mut b = [0.0; MAX_ORDER];
        let mut left = [0.0; MAX_ORDER];
        let mut right = [0.0; MAX_ORDER];
        b[0] = 1.0;
        for j in 1..=k {
            left[j] = x - t[l + 1 - j];
            right[j] = t[l + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                // Denominator is knots[l+r+1] - knots[l+r+1-j]: it spans the
                // non-empty interval [knots[l], knots[l+1]], independent of x.
                let temp = b[r] / (right[r + 1] + left[j - r]);
                b[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            b[j] = saved;
        }
        (l - k, b)
    }

    /// `n x n` matrix of basis values at the sample coordinates.
    fn collocation(&self, coords: &[f64]) -> DMatrix<f64> {
        let mut a = DMatrix::<f64>::zeros(self.n, self.n);
        for (i, &x) in coords.iter().enumerate() {
            let (first, b) = self.basis(x);
            for (r, &value) in b.iter().take(self.degree + 1).enumerate() {
                a[(i, first + r)] = value;
            }
        }
        a
    }
}

/// Fitted tensor-product spline surface.
#[derive(Clone, Debug)]
pub(crate) struct TensorSpline {
    rows: AxisBasis,
    cols: AxisBasis,
    coefficients: DMatrix<f64>,
}

impl TensorSpline {
    pub(crate) fn fit(
        row_coords: &[f64],
        col_coords: &[f64],
        values: &DMatrix<f64>,
        degree: usize,
    ) -> Result<Self, InterpolateError> {
        let rows = AxisBasis::not_a_knot(row_coords, degree);
        let cols = AxisBasis::not_a_knot(col_coords, degree);

        // A_r * Z = V, then A_c * C^T = Z^T.
        let z = rows
            .collocation(row_coords)
            .lu()
            .solve(values)
            .ok_or(InterpolateError::SplineFit { axis: Axis::Row })?;
        let coefficients = cols
            .collocation(col_coords)
            .lu()
            .solve(&z.transpose())
            .ok_or(InterpolateError::SplineFit { axis: Axis::Col })?
            .transpose();

        Ok(Self {
            rows,
            cols,
            coefficients,
        })
    }

    pub(crate) fn evaluate(&self, row: f64, col: f64) -> f64 {
        let order = self.rows.degree + 1;
        let (r0, br) = self.rows.basis(row);
        let (c0, bc) = self.cols.basis(col);

        let mut acc = 0.0;
        for (a, &wr) in br.iter().take(order).enumerate() {
            let mut inner = 0.0;
            for (b, &wc) in bc.iter().take(order).enumerate() {
                inner += wc * self.coefficients[(r0 + a, c0 + b)];
            }
            acc += wr * inner;
        }
        acc
    }
}
