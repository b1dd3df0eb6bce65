//! Per-axis index lookup for the nearest and linear kernels.
//!
//! Both functions take a strictly increasing axis with at least two entries.

/// Index of the coordinate closest to `x`; ties go to the lower index and
/// points outside the axis snap to the boundary.
#[inline]
pub(crate) fn nearest_index(coords: &[f64], x: f64) -> usize {
    let n = coords.len();
    let hi = coords.partition_point(|&c| c < x);
    if hi == 0 {
        return 0;
    }
    if hi == n {
        return n - 1;
    }
    if x - coords[hi - 1] <= coords[hi] - x {
        hi - 1
    } else {
        hi
    }
}

/// Cell index `i` in `0..n-1` and the unclamped offset of `x` within
/// `[coords[i], coords[i + 1]]`.
///
/// Outside the axis the boundary cell is used, so the offset falls below 0
/// or above 1 and the caller's blend turns into linear extrapolation.
#[inline]
pub(crate) fn linear_cell(coords: &[f64], x: f64) -> (usize, f64) {
    let n = coords.len();
    let i = coords
        .partition_point(|&c| c <= x)
        .saturating_sub(1)
        .min(n - 2);
    let t = (x - coords[i]) / (coords[i + 1] - coords[i]);
    (i, t)
}

/// `(1 - t) * a + t * b`, exact at `t == 0` and `t == 1`.
#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_breaks_ties_downwards() {
        let axis = [0.0, 1.0, 2.0];
        assert_eq!(nearest_index(&axis, 0.5), 0);
        assert_eq!(nearest_index(&axis, 1.5), 1);
        assert_eq!(nearest_index(&axis, 1.4), 1);
        assert_eq!(nearest_index(&axis, 1.6), 2);
    }

    #[test]
    fn nearest_respects_uneven_spacing() {
        let axis = [0.0, 1.0, 10.0];
        assert_eq!(nearest_index(&axis, 5.0), 1);
        assert_eq!(nearest_index(&axis, 6.0), 2);
    }

    #[test]
    fn nearest_snaps_outside_points_to_the_boundary() {
        let axis = [0.0, 1.0, 2.0];
        assert_eq!(nearest_index(&axis, -3.0), 0);
        assert_eq!(nearest_index(&axis, 7.0), 2);
        for (i, &c) in axis.iter().enumerate() {
            assert_eq!(nearest_index(&axis, c), i);
        }
    }

    #[test]
    fn linear_cell_clamps_index_not_offset() {
        let axis = [0.0, 1.0, 3.0];
        assert_eq!(linear_cell(&axis, 0.25), (0, 0.25));
        assert_eq!(linear_cell(&axis, 2.0), (1, 0.5));
        assert_eq!(linear_cell(&axis, 3.0), (1, 1.0));
        assert_eq!(linear_cell(&axis, -1.0), (0, -1.0));
        assert_eq!(linear_cell(&axis, 5.0), (1, 2.0));
    }

    #[test]
    fn lerp_is_exact_at_the_ends() {
        assert_eq!(lerp(0.1, 0.7, 0.0), 0.1);
        assert_eq!(lerp(0.1, 0.7, 1.0), 0.7);
    }
}
