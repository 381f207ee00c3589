//! Self-consistent correction: re-solve the mean-field equations with the
//! frozen correction folded into the effective Hamiltonian.

use nalgebra::DVector;
use tracing::info;

use super::{post_scf_losc, validate_snapshot};
use crate::config::LoscSettings;
use crate::dfa::DfaDescriptor;
use crate::error::LoscError;
use crate::solver::{IntegralProvider, SolverDriver};
use crate::wavefunction::WavefunctionSnapshot;

/// Outcome of a self-consistent correction.
#[derive(Debug, Clone)]
pub struct ScfLoscOutput {
    /// The re-converged solution with the correction included.
    pub snapshot: WavefunctionSnapshot,
    /// Base-functional contribution to the total energy, hartree.
    pub dfa_energy: f64,
    /// Correction contribution reported by the solver, hartree.
    pub losc_energy: f64,
    /// Corrected total energy, hartree.
    pub total_energy: f64,
    /// Corrected orbital energies in the requested unit.
    pub orbital_energies: Vec<DVector<f64>>,
}

/// Re-solve the reference calculation with the correction applied at every
/// iteration of the solver's own SCF loop.
///
/// Only the default aufbau ground-state occupation is supported here. The
/// reference snapshot is persisted as the restart seed and used verbatim as
/// the solver's initial guess; the correction payload lives only for this
/// one invocation. Solver failures, including non-convergence of the inner
/// SCF loop, propagate verbatim.
pub fn scf_losc<P: IntegralProvider, D: SolverDriver>(
    dfa: &DfaDescriptor,
    snapshot: &WavefunctionSnapshot,
    window: Option<&[f64]>,
    integrals: &P,
    driver: &mut D,
    settings: &LoscSettings,
) -> Result<ScfLoscOutput, LoscError> {
    let resolved = settings.resolve()?;
    validate_snapshot(snapshot, &resolved)?;
    if snapshot.has_custom_occupation() {
        return Err(LoscError::CustomOccupationUnsupported);
    }

    // Frozen correction data at the reference orbitals: curvature, localized
    // orbitals, and local occupation.
    let frozen = post_scf_losc(dfa, snapshot, window, integrals, settings)?;

    let guess = driver.save_guess(snapshot)?;
    info!(
        "re-solving {} from the persisted reference guess with the correction \
         in the effective Hamiltonian",
        dfa.name()
    );
    let output = driver.resolve(&snapshot.functional.name, guess, frozen.correction_payload())?;

    let losc_energy = output.losc_energy()?;
    let total_energy = output.snapshot.total_energy;
    let dfa_energy = total_energy - losc_energy;

    let factor = resolved.orbital_energy_unit.orbital_energy_factor();
    let orbital_energies: Vec<DVector<f64>> = output
        .snapshot
        .orbital_energies
        .iter()
        .map(|eps| eps * factor)
        .collect();

    info!(
        "self-consistent LOSC: total energy {:.10} au ({:.10} au functional, \
         {:.10} au correction)",
        total_energy, dfa_energy, losc_energy
    );

    Ok(ScfLoscOutput {
        snapshot: output.snapshot,
        dfa_energy,
        losc_energy,
        total_energy,
        orbital_energies,
    })
}
