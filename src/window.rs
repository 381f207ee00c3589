//! Selection of canonical orbitals by energy window.

use nalgebra::{DMatrix, DVector};

use crate::error::LoscError;
use crate::units::HARTREE_TO_EV;

/// Half-open index interval into the energy-ordered orbital list, or no
/// restriction at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitalWindow {
    Full,
    Range { start: usize, end: usize },
}

impl OrbitalWindow {
    pub fn orbital_count(&self, n_orbitals: usize) -> usize {
        match self {
            OrbitalWindow::Full => n_orbitals,
            OrbitalWindow::Range { start, end } => end - start,
        }
    }

    /// Index range covered by the window for a channel with `n_orbitals`
    /// orbitals.
    pub fn indices(&self, n_orbitals: usize) -> std::ops::Range<usize> {
        match self {
            OrbitalWindow::Full => 0..n_orbitals,
            OrbitalWindow::Range { start, end } => *start..*end,
        }
    }

    /// Columns of the coefficient matrix covered by the window.
    pub fn select_columns(&self, coefficients: &DMatrix<f64>) -> DMatrix<f64> {
        match self {
            OrbitalWindow::Full => coefficients.clone(),
            OrbitalWindow::Range { start, end } => {
                coefficients.columns(*start, end - start).into_owned()
            }
        }
    }
}

/// Map an energy window in eV onto a contiguous range of canonical orbitals.
///
/// `orbital_energies` are the channel's canonical energies in hartree,
/// ascending. No window, or a channel without electrons, selects every
/// orbital. The bounds are half-open: an orbital is inside if its energy is
/// at least `lo` and below `hi`.
pub fn select_window(
    orbital_energies: &DVector<f64>,
    window: Option<&[f64]>,
    channel_electrons: f64,
) -> Result<OrbitalWindow, LoscError> {
    let Some(bounds) = window else {
        return Ok(OrbitalWindow::Full);
    };
    if channel_electrons == 0.0 {
        return Ok(OrbitalWindow::Full);
    }
    if bounds.len() != 2 {
        return Err(LoscError::InvalidWindow {
            reason: format!("expected two bounds, got {}", bounds.len()),
        });
    }
    let (lo, hi) = (bounds[0], bounds[1]);
    if lo >= hi {
        return Err(LoscError::InvalidWindow {
            reason: format!("left bound {lo} is not below right bound {hi}"),
        });
    }

    let nbf = orbital_energies.len();
    let first_at_or_above = |threshold_ev: f64| {
        orbital_energies
            .iter()
            .position(|&e| e * HARTREE_TO_EV >= threshold_ev)
            .unwrap_or(nbf)
    };
    let start = first_at_or_above(lo);
    let end = first_at_or_above(hi);
    if end <= start {
        return Err(LoscError::EmptySelection { lo, hi });
    }
    Ok(OrbitalWindow::Range { start, end })
}
