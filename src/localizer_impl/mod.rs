//! Orbital localization.
//!
//! A localizer turns a set of canonical orbitals into spatially localized
//! orbitals through a unitary rotation. Non-convergence is reported on the
//! result, never raised: the pipeline continues with the best rotation
//! found and the caller decides how loudly to warn.

mod v2;

#[cfg(test)]
mod tests;

pub use v2::LocalizerV2;

use nalgebra::DMatrix;

use crate::error::LoscError;

/// Outcome of localizing one spin channel.
#[derive(Debug, Clone)]
pub struct LocalizationResult {
    /// Localized-orbital coefficients, `nbf x nlo`.
    pub lo_coefficients: DMatrix<f64>,
    /// Unitary transform from canonical to localized orbitals, `nlo x nlo`.
    pub transform: DMatrix<f64>,
    /// Number of Jacobi sweeps performed.
    pub iterations: usize,
    /// Final value of the localization objective.
    pub cost: f64,
    pub converged: bool,
}

/// Contract every localization kernel satisfies.
///
/// `coefficients` are the windowed canonical orbitals (`nbf x nlo`),
/// `hamiltonian` the AO Fock/core Hamiltonian, `dipole` the three AO
/// dipole-moment integral matrices entering the localization objective.
pub trait OrbitalLocalizer {
    fn localize(
        &self,
        coefficients: &DMatrix<f64>,
        hamiltonian: &DMatrix<f64>,
        dipole: &[DMatrix<f64>; 3],
    ) -> Result<LocalizationResult, LoscError>;
}
