//! One-shot correction on top of a fixed reference wavefunction.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

use super::validate_snapshot;
use crate::config::{CurvatureKind, LocalizerKind, LoscSettings};
use crate::correction::{
    ao_hamiltonian_correction, corrected_orbital_energies, energy_correction,
    total_energy_correction,
};
use crate::curvature_impl::{CurvatureInput, CurvatureKernel, CurvatureV1, CurvatureV2};
use crate::dfa::DfaDescriptor;
use crate::error::LoscError;
use crate::localizer_impl::{LocalizationResult, LocalizerV2, OrbitalLocalizer};
use crate::occupation::local_occupation;
use crate::result::{LocalizationSummary, LoscMetadata, LoscResult};
use crate::solver::IntegralProvider;
use crate::wavefunction::WavefunctionSnapshot;
use crate::window::{select_window, OrbitalWindow};

/// Compute the frozen (non-self-consistent) correction for a converged
/// reference.
///
/// `window` is an optional orbital energy window in eV restricting which
/// canonical orbitals enter the localization. All preconditions are checked
/// before the integral provider is touched.
pub fn post_scf_losc<P: IntegralProvider>(
    dfa: &DfaDescriptor,
    snapshot: &WavefunctionSnapshot,
    window: Option<&[f64]>,
    integrals: &P,
    settings: &LoscSettings,
) -> Result<LoscResult, LoscError> {
    let resolved = settings.resolve()?;
    validate_snapshot(snapshot, &resolved)?;

    let nspin = snapshot.spin_channels();
    info!("==> LOSC correction on top of {} <==", dfa.name());

    // Electron counts come from the occupation assignment, not from the
    // integer counts a solver may report; fractional systems are valid here.
    let occupations: Vec<DVector<f64>> =
        (0..nspin).map(|spin| snapshot.occupation_vector(spin)).collect();
    let electrons: Vec<f64> = occupations.iter().map(|occ| occ.sum()).collect();

    let mut windows = Vec::with_capacity(nspin);
    for spin in 0..nspin {
        let selected = select_window(&snapshot.orbital_energies[spin], window, electrons[spin])?;
        match selected {
            OrbitalWindow::Full => info!("localization orbitals (spin {spin}): all"),
            OrbitalWindow::Range { start, end } => {
                info!("localization orbitals (spin {spin}): [{start}, {end})")
            }
        }
        windows.push(selected);
    }

    let dipole = integrals.ao_dipole()?;
    let localizer = match resolved.localizer {
        LocalizerKind::V2 {
            c,
            gamma,
            max_iter,
            convergence,
            random_permutation,
        } => LocalizerV2::new(c, gamma)
            .with_max_iter(max_iter)
            .with_convergence(convergence)
            .with_random_permutation(random_permutation),
    };

    let mut localizations: Vec<LocalizationResult> = Vec::with_capacity(nspin);
    for spin in 0..nspin {
        let windowed = windows[spin].select_columns(&snapshot.coefficients[spin]);
        let localized = localizer.localize(&windowed, &snapshot.fock[spin], &dipole)?;
        info!(
            "localization (spin {spin}): {} sweeps, cost {:.6e}",
            localized.iterations, localized.cost
        );
        if !localized.converged {
            warn!(
                "localization did not converge for spin {spin} within {} sweeps, \
                 continuing with the best rotation found",
                localized.iterations
            );
        }
        localizations.push(localized);
    }

    let lo_coefficients: Vec<DMatrix<f64>> = localizations
        .iter()
        .map(|l| l.lo_coefficients.clone())
        .collect();
    let df = integrals.df_tensors(&lo_coefficients)?;
    if df.pii.len() != nspin {
        return Err(LoscError::DimensionMismatch {
            name: "density fitting spin channels",
            expected_rows: nspin,
            expected_cols: 1,
            rows: df.pii.len(),
            cols: 1,
        });
    }
    let grid_weights = integrals.grid_weights()?;

    let kernel: Box<dyn CurvatureKernel> = match resolved.curvature {
        CurvatureKind::V1 { tau } => Box::new(CurvatureV1::new(tau)),
        CurvatureKind::V2 { tau, zeta } => Box::new(CurvatureV2::new(tau, zeta)),
    };

    let mut curvature = Vec::with_capacity(nspin);
    let mut occupation_matrices = Vec::with_capacity(nspin);
    for spin in 0..nspin {
        let grid_lo = integrals.grid_lo_values(&lo_coefficients[spin])?;
        let input = CurvatureInput {
            dfa,
            df_pii: &df.pii[spin],
            df_metric_inverse: &df.metric_inverse,
            grid_lo: &grid_lo,
            grid_weights: &grid_weights,
        };
        curvature.push(kernel.kappa(&input)?);
        occupation_matrices.push(local_occupation(
            &lo_coefficients[spin],
            &snapshot.overlap,
            &snapshot.density[spin],
        )?);
        debug!(
            "spin {spin}: curvature and local occupation over {} localized orbitals",
            lo_coefficients[spin].ncols()
        );
    }

    let factor = resolved.orbital_energy_unit.orbital_energy_factor();
    let mut hamiltonian_corrections = Vec::with_capacity(nspin);
    let mut channel_energy_corrections = Vec::with_capacity(nspin);
    let mut corrected_eps = Vec::with_capacity(nspin);
    let mut dfa_eps = Vec::with_capacity(nspin);
    for spin in 0..nspin {
        let hamiltonian = ao_hamiltonian_correction(
            &snapshot.overlap,
            &lo_coefficients[spin],
            &curvature[spin],
            &occupation_matrices[spin],
        )?;
        channel_energy_corrections.push(energy_correction(
            &curvature[spin],
            &occupation_matrices[spin],
        )?);
        let eps = corrected_orbital_energies(
            &snapshot.orbital_energies[spin],
            &snapshot.coefficients[spin],
            &hamiltonian,
            &windows[spin],
        )?;
        corrected_eps.push(eps * factor);
        dfa_eps.push(&snapshot.orbital_energies[spin] * factor);
        hamiltonian_corrections.push(hamiltonian);
    }

    let energy_correction_total =
        total_energy_correction(&channel_energy_corrections, snapshot.restricted);
    let corrected_total_energy = snapshot.total_energy + energy_correction_total;
    info!(
        "LOSC energy correction: {:.10} au, corrected total energy: {:.10} au",
        energy_correction_total, corrected_total_energy
    );

    Ok(LoscResult {
        hamiltonian_corrections,
        channel_energy_corrections,
        energy_correction: energy_correction_total,
        dfa_total_energy: snapshot.total_energy,
        corrected_total_energy,
        dfa_orbital_energies: dfa_eps,
        corrected_orbital_energies: corrected_eps,
        curvature,
        local_occupation: occupation_matrices,
        lo_coefficients,
        localization: localizations
            .iter()
            .map(|l| LocalizationSummary {
                iterations: l.iterations,
                cost: l.cost,
                converged: l.converged,
            })
            .collect(),
        metadata: LoscMetadata {
            localizer: resolved.localizer,
            curvature: resolved.curvature,
            windows,
            occupations,
            orbital_energy_unit: resolved.orbital_energy_unit,
        },
    })
}
