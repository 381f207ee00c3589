//! Error types for the LOSC pipeline.
//!
//! Input and configuration problems are checked eagerly, before any numeric
//! work starts, so a failed call leaves no partial result behind. Localizer
//! non-convergence is intentionally absent here: it is reported as a status
//! on the localization result, not raised.

use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoscError {
    #[error("invalid orbital energy window: {reason}")]
    InvalidWindow { reason: String },

    #[error("orbital energy window [{lo}, {hi}) eV selects no orbitals")]
    EmptySelection { lo: f64, hi: f64 },

    #[error("only C1 symmetry is supported, snapshot reports '{0}'")]
    UnsupportedSymmetry(String),

    #[error("snapshot spin treatment (restricted = {snapshot_restricted}) does not match the declared reference")]
    ReferenceMismatch { snapshot_restricted: bool },

    #[error("unsupported functional '{name}': {reason}")]
    UnsupportedFunctional { name: String, reason: String },

    #[error("self-consistent correction does not support customized occupation numbers")]
    CustomOccupationUnsupported,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported localizer version {0}, only version 2 is available")]
    UnsupportedLocalizerVersion(u32),

    #[error("unsupported curvature version {0}, available versions are 1 and 2")]
    UnsupportedCurvatureVersion(u32),

    #[error("wrong dimension for {name}: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        name: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("mean-field solver failed: {message}")]
    Solver { message: String },
}

impl LoscError {
    pub fn solver(message: impl Into<String>) -> Self {
        LoscError::Solver {
            message: message.into(),
        }
    }
}

/// Check one matrix against the shape the surrounding stage requires.
pub(crate) fn expect_shape(
    name: &'static str,
    m: &DMatrix<f64>,
    rows: usize,
    cols: usize,
) -> Result<(), LoscError> {
    if m.nrows() != rows || m.ncols() != cols {
        return Err(LoscError::DimensionMismatch {
            name,
            expected_rows: rows,
            expected_cols: cols,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}
