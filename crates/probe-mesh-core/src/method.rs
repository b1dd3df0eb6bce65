use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interpolation scheme used to evaluate a [`crate::GridSample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Value of the closest sample, chosen independently per axis.
    #[default]
    Nearest,
    /// Bilinear blend of the four surrounding samples.
    Linear,
    /// Tensor-product cubic B-spline with not-a-knot ends.
    Cubic,
    /// Tensor-product quintic B-spline with not-a-knot ends.
    Quintic,
}

impl InterpolationMethod {
    pub const ALL: [InterpolationMethod; 4] = [
        InterpolationMethod::Nearest,
        InterpolationMethod::Linear,
        InterpolationMethod::Cubic,
        InterpolationMethod::Quintic,
    ];

    /// Minimum number of samples required along each axis.
    #[inline]
    pub fn min_points(self) -> usize {
        match self {
            InterpolationMethod::Nearest | InterpolationMethod::Linear => 2,
            InterpolationMethod::Cubic => 4,
            InterpolationMethod::Quintic => 6,
        }
    }

    /// Spline degree for the spline methods, `None` otherwise.
    #[inline]
    pub fn spline_degree(self) -> Option<usize> {
        match self {
            InterpolationMethod::Cubic => Some(3),
            InterpolationMethod::Quintic => Some(5),
            InterpolationMethod::Nearest | InterpolationMethod::Linear => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InterpolationMethod::Nearest => "nearest",
            InterpolationMethod::Linear => "linear",
            InterpolationMethod::Cubic => "cubic",
            InterpolationMethod::Quintic => "quintic",
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown interpolation method '{0}' (expected nearest, linear, cubic or quintic)")]
pub struct ParseMethodError(pub String);

impl FromStr for InterpolationMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for method in InterpolationMethod::ALL {
            assert_eq!(method.to_string().parse::<InterpolationMethod>(), Ok(method));
        }
        assert_eq!("  Cubic ".parse(), Ok(InterpolationMethod::Cubic));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "bicubic".parse::<InterpolationMethod>().unwrap_err();
        assert!(err.to_string().contains("bicubic"));
    }

    #[test]
    fn serde_uses_lower_case_names() {
        let json = serde_json::to_string(&InterpolationMethod::Quintic).expect("serialize");
        assert_eq!(json, "\"quintic\"");
        let back: InterpolationMethod = serde_json::from_str("\"linear\"").expect("deserialize");
        assert_eq!(back, InterpolationMethod::Linear);
    }

    #[test]
    fn min_points_follow_spline_degree() {
        assert_eq!(InterpolationMethod::Nearest.min_points(), 2);
        assert_eq!(InterpolationMethod::Linear.min_points(), 2);
        for method in [InterpolationMethod::Cubic, InterpolationMethod::Quintic] {
            let degree = method.spline_degree().expect("spline method");
            assert_eq!(method.min_points(), degree + 1);
        }
    }
}
