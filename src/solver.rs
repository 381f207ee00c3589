//! Boundaries to the external collaborators.
//!
//! The mean-field solver and the integral/grid engine live outside this
//! crate. Everything they must provide is captured by the two traits here;
//! tests substitute mock implementations.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::error::LoscError;
use crate::wavefunction::WavefunctionSnapshot;

/// Key of the correction contribution in the solver's energy decomposition.
pub const LOSC_ENERGY_KEY: &str = "LOSC energy";

/// Density-fitting data projected onto the localized orbitals.
#[derive(Debug, Clone)]
pub struct DensityFittingTensors {
    /// Per-spin three-center tensors `(p|ii)`, `nfit x nlo`.
    pub pii: Vec<DMatrix<f64>>,
    /// Inverse of the shared two-index fitting metric, `nfit x nfit`.
    pub metric_inverse: DMatrix<f64>,
}

/// Integral and numerical-grid engine.
///
/// Implementations compute AO integrals and grid data for the basis set
/// behind the snapshot being corrected. All matrices use the same AO
/// ordering as the snapshot.
pub trait IntegralProvider {
    /// AO dipole-moment integrals for the three Cartesian directions.
    fn ao_dipole(&self) -> Result<[DMatrix<f64>; 3], LoscError>;

    /// Three-center density-fitting tensors projected onto the given
    /// per-spin localized orbitals, plus the inverse fitting metric.
    fn df_tensors(
        &self,
        lo_coefficients: &[DMatrix<f64>],
    ) -> Result<DensityFittingTensors, LoscError>;

    /// Quadrature weights of the numerical integration grid.
    fn grid_weights(&self) -> Result<DVector<f64>, LoscError>;

    /// Values of the given localized orbitals on the grid, `npts x nlo`.
    fn grid_lo_values(&self, lo_coefficients: &DMatrix<f64>) -> Result<DMatrix<f64>, LoscError>;
}

/// Correction data the solver folds into its Fock matrix on every iteration
/// of the re-solve. Passed by value into exactly one invocation; nothing is
/// attached to any snapshot.
#[derive(Debug, Clone)]
pub struct CorrectionPayload {
    pub curvature: Vec<DMatrix<f64>>,
    pub local_occupation: Vec<DMatrix<f64>>,
    pub lo_coefficients: Vec<DMatrix<f64>>,
}

/// Result of a solver re-invocation: the new converged solution and the
/// energy decomposition keyed by contribution name.
#[derive(Debug, Clone)]
pub struct SolverOutput {
    pub snapshot: WavefunctionSnapshot,
    pub energies: HashMap<String, f64>,
}

impl SolverOutput {
    /// The correction contribution to the total energy. Its absence is a
    /// solver contract violation.
    pub fn losc_energy(&self) -> Result<f64, LoscError> {
        self.energies.get(LOSC_ENERGY_KEY).copied().ok_or_else(|| {
            LoscError::solver(format!(
                "energy decomposition is missing the '{LOSC_ENERGY_KEY}' entry"
            ))
        })
    }
}

/// External mean-field solver.
///
/// `Guess` is the solver's opaque restart artifact. It is produced once per
/// self-consistent correction and consumed by value by the single `resolve`
/// call it seeds, so a seed can never be reused across invocations.
pub trait SolverDriver {
    type Guess;

    /// Persist the snapshot as a restart seed. The seed must later be used
    /// verbatim as the initial guess, overriding any default guess strategy.
    fn save_guess(&mut self, snapshot: &WavefunctionSnapshot) -> Result<Self::Guess, LoscError>;

    /// Re-run the solver for `functional`, starting from `guess`, with the
    /// correction folded into the effective Hamiltonian at every iteration.
    /// Any failure, including non-convergence of the solver's own SCF loop,
    /// must be reported as an error.
    fn resolve(
        &mut self,
        functional: &str,
        guess: Self::Guess,
        correction: CorrectionPayload,
    ) -> Result<SolverOutput, LoscError>;
}
