//! Core numeric engine for probe height meshes.
//!
//! A probe mesh is a sparse regular grid of height measurements. This crate
//! turns it into a dense surface for display:
//!
//! - [`GridSample`]: validated, immutable measured grid,
//! - [`Interpolator`]: height queries under an [`InterpolationMethod`],
//!   extrapolating outside the sampled domain,
//! - [`ResampleGridBuilder`]: dense query grid from an extent and a density,
//! - [`SurfaceStatistics`]: min/max/mean/std/peak-to-valley of any height matrix.
//!
//! Everything here is pure and synchronous. File formats live in
//! `probe-mesh-io`; drawing is left to the caller.

mod grid;
mod interpolate;
mod logger;
mod method;
mod resample;
mod stats;
mod surface;

pub use grid::{matrix_from_rows, AxisLayout, GridExtent, GridSample, GridValidationError};
pub use interpolate::{Axis, InterpolateError, Interpolator};
pub use method::{InterpolationMethod, ParseMethodError};
pub use resample::{
    linspace, QueryGrid, QueryGridError, QueryPoint, ResampleDensity, ResampleError,
    ResampleGridBuilder,
};
pub use stats::{Statistics, StatisticsError, SurfaceStatistics};
pub use surface::ResampledSurface;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
