//! Loading, validating and writing probe mesh files.
//!
//! This crate is the loader collaborator of `probe-mesh-core`: it detects the
//! file format, checks the heights and hands over a validated
//! [`probe_mesh_core::GridSample`]. It also owns the JSON run configuration
//! and the surface report written by the `probe-mesh` tool.

mod config;
mod format;
mod job;
mod validate;
mod write;

use std::path::{Path, PathBuf};

use probe_mesh_core::{AxisLayout, GridSample, GridValidationError};

pub use config::{ResampleConfig, SurfaceReport};
pub use format::{
    load_heights, parse_heights, parse_with, FormatAttempt, FormatError, LoadedHeights,
    ProbeFormat,
};
pub use job::{run_resample, ResampleJobError};
pub use validate::{validate_heights, ValidationIssue, ValidationPolicy};
pub use write::{save_heights, write_heights};

#[derive(thiserror::Error, Debug)]
pub enum ProbeIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors from turning a file into a grid.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse {origin}: {}", join_attempts(.attempts))]
    NoFormatMatched {
        origin: String,
        attempts: Vec<FormatAttempt>,
    },
    #[error(transparent)]
    Validation(#[from] ValidationIssue),
    #[error(transparent)]
    Grid(#[from] GridValidationError),
}

fn join_attempts(attempts: &[FormatAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A validated grid and the format it was read from.
#[derive(Clone, Debug)]
pub struct LoadedGrid {
    pub format: ProbeFormat,
    pub grid: GridSample,
}

/// Load, validate and wrap a probe file into a grid.
pub fn load_grid(
    path: impl AsRef<Path>,
    policy: &ValidationPolicy,
    layout: AxisLayout,
) -> Result<LoadedGrid, LoadError> {
    let LoadedHeights { format, heights } = load_heights(path)?;
    validate_heights(&heights, policy)?;
    let grid = GridSample::from_heights(heights, layout)?;
    Ok(LoadedGrid { format, grid })
}
