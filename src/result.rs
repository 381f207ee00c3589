//! Output of a full correction run.

use nalgebra::{DMatrix, DVector};

use crate::config::{CurvatureKind, LocalizerKind};
use crate::solver::CorrectionPayload;
use crate::units::EnergyUnit;
use crate::window::OrbitalWindow;

/// Convergence diagnostics of one channel's localization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalizationSummary {
    pub iterations: usize,
    pub cost: f64,
    pub converged: bool,
}

/// Which algorithms, window, and occupation assignment produced a result.
#[derive(Debug, Clone, PartialEq)]
pub struct LoscMetadata {
    pub localizer: LocalizerKind,
    pub curvature: CurvatureKind,
    pub windows: Vec<OrbitalWindow>,
    pub occupations: Vec<DVector<f64>>,
    pub orbital_energy_unit: EnergyUnit,
}

/// Complete outcome of a correction. Total energies are in hartree; orbital
/// energies are in the unit recorded in the metadata.
#[derive(Debug, Clone)]
pub struct LoscResult {
    /// Per-spin Hamiltonian corrections in the AO basis, Fock-shaped.
    pub hamiltonian_corrections: Vec<DMatrix<f64>>,
    /// Per-spin scalar energy corrections in hartree.
    pub channel_energy_corrections: Vec<f64>,
    /// Total energy correction in hartree (restricted doubling applied).
    pub energy_correction: f64,
    /// Total energy of the uncorrected reference in hartree.
    pub dfa_total_energy: f64,
    /// Reference energy plus the correction, hartree.
    pub corrected_total_energy: f64,
    /// Uncorrected canonical orbital energies, unit-scaled.
    pub dfa_orbital_energies: Vec<DVector<f64>>,
    /// Corrected orbital energies, unit-scaled; entries outside the orbital
    /// window equal the uncorrected values.
    pub corrected_orbital_energies: Vec<DVector<f64>>,
    /// Per-spin curvature matrices over localized-orbital pairs.
    pub curvature: Vec<DMatrix<f64>>,
    /// Per-spin local occupation matrices.
    pub local_occupation: Vec<DMatrix<f64>>,
    /// Per-spin localized-orbital coefficients.
    pub lo_coefficients: Vec<DMatrix<f64>>,
    /// Per-spin localization diagnostics.
    pub localization: Vec<LocalizationSummary>,
    pub metadata: LoscMetadata,
}

impl LoscResult {
    pub fn spin_channels(&self) -> usize {
        self.hamiltonian_corrections.len()
    }

    /// The data a solver needs to fold the correction into its effective
    /// Hamiltonian during a self-consistent re-solve.
    pub fn correction_payload(&self) -> CorrectionPayload {
        CorrectionPayload {
            curvature: self.curvature.clone(),
            local_occupation: self.local_occupation.clone(),
            lo_coefficients: self.lo_coefficients.clone(),
        }
    }

    /// True if every channel's localization converged.
    pub fn localization_converged(&self) -> bool {
        self.localization.iter().all(|summary| summary.converged)
    }
}
