//! Assembly of the LOSC corrections from curvature and local occupation.
//!
//! Everything here is deterministic linear algebra on one spin channel; the
//! only failure mode is a shape mismatch between the inputs.

use nalgebra::{DMatrix, DVector};

use crate::error::{expect_shape, LoscError};
use crate::window::OrbitalWindow;

/// Effective Hamiltonian correction in the AO basis:
/// H = S * C_lo * [kappa o (I/2 - lambda)] * C_lo^T * S.
///
/// Symmetric and Fock-shaped by construction.
pub fn ao_hamiltonian_correction(
    overlap: &DMatrix<f64>,
    lo_coefficients: &DMatrix<f64>,
    curvature: &DMatrix<f64>,
    local_occupation: &DMatrix<f64>,
) -> Result<DMatrix<f64>, LoscError> {
    let nbf = overlap.nrows();
    let nlo = lo_coefficients.ncols();
    expect_shape("overlap matrix", overlap, nbf, nbf)?;
    expect_shape("LO coefficient matrix", lo_coefficients, nbf, nlo)?;
    expect_shape("curvature matrix", curvature, nlo, nlo)?;
    expect_shape("local occupation matrix", local_occupation, nlo, nlo)?;

    let mut kernel = DMatrix::zeros(nlo, nlo);
    for i in 0..nlo {
        for j in 0..nlo {
            let delta = if i == j { 0.5 } else { 0.0 };
            kernel[(i, j)] = curvature[(i, j)] * (delta - local_occupation[(i, j)]);
        }
    }

    let projected = overlap * lo_coefficients;
    Ok(&projected * kernel * projected.transpose())
}

/// Scalar energy correction of one spin channel:
/// E = 1/2 sum_i kappa_ii lambda_ii (1 - lambda_ii)
///   - sum_{i<j} kappa_ij lambda_ij^2.
pub fn energy_correction(
    curvature: &DMatrix<f64>,
    local_occupation: &DMatrix<f64>,
) -> Result<f64, LoscError> {
    let nlo = curvature.nrows();
    expect_shape("curvature matrix", curvature, nlo, nlo)?;
    expect_shape("local occupation matrix", local_occupation, nlo, nlo)?;

    let mut energy = 0.0;
    for i in 0..nlo {
        let lambda_ii = local_occupation[(i, i)];
        energy += 0.5 * curvature[(i, i)] * lambda_ii * (1.0 - lambda_ii);
        for j in 0..i {
            let lambda_ij = local_occupation[(i, j)];
            energy -= curvature[(i, j)] * lambda_ij * lambda_ij;
        }
    }
    Ok(energy)
}

/// First-order corrected orbital energies in hartree.
///
/// Inside the orbital window each canonical energy picks up the projection
/// of the Hamiltonian correction onto its own canonical orbital; outside the
/// window the canonical energies pass through unchanged.
pub fn corrected_orbital_energies(
    orbital_energies: &DVector<f64>,
    coefficients: &DMatrix<f64>,
    hamiltonian_correction: &DMatrix<f64>,
    window: &OrbitalWindow,
) -> Result<DVector<f64>, LoscError> {
    let nbf = coefficients.nrows();
    let nmo = coefficients.ncols();
    expect_shape(
        "Hamiltonian correction matrix",
        hamiltonian_correction,
        nbf,
        nbf,
    )?;
    if orbital_energies.len() != nmo {
        return Err(LoscError::DimensionMismatch {
            name: "orbital energies",
            expected_rows: nmo,
            expected_cols: 1,
            rows: orbital_energies.len(),
            cols: 1,
        });
    }

    let mut corrected = orbital_energies.clone();
    for i in window.indices(nmo) {
        let ci = coefficients.column(i);
        corrected[i] += (ci.transpose() * hamiltonian_correction * ci)[(0, 0)];
    }
    Ok(corrected)
}

/// Total correction over spin channels: a restricted (spin-degenerate)
/// calculation counts its single channel twice, an unrestricted one sums
/// both channels.
pub fn total_energy_correction(channel_corrections: &[f64], restricted: bool) -> f64 {
    if restricted {
        2.0 * channel_corrections[0]
    } else {
        channel_corrections.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn restricted_total_doubles_the_channel() {
        // Identity-like synthetic channel data with a known contribution.
        let kappa = DMatrix::from_element(1, 1, 2.0);
        let lambda = DMatrix::from_element(1, 1, 0.5);
        let channel = energy_correction(&kappa, &lambda).unwrap();
        assert_relative_eq!(channel, 0.25, epsilon = 1e-14);
        assert_relative_eq!(
            total_energy_correction(&[channel], true),
            2.0 * channel,
            epsilon = 1e-14
        );
    }

    #[test]
    fn unrestricted_total_sums_both_channels() {
        assert_relative_eq!(
            total_energy_correction(&[0.25, -0.1], false),
            0.15,
            epsilon = 1e-14
        );
    }

    #[test]
    fn off_diagonal_occupation_lowers_the_energy() {
        let kappa = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 2.0]);
        let lambda = DMatrix::from_row_slice(2, 2, &[0.9, 0.2, 0.2, 0.4]);
        let energy = energy_correction(&kappa, &lambda).unwrap();
        let expected = 0.5 * (1.0 * 0.9 * 0.1 + 2.0 * 0.4 * 0.6) - 0.5 * 0.04;
        assert_relative_eq!(energy, expected, epsilon = 1e-14);
    }

    #[test]
    fn hamiltonian_correction_is_symmetric_and_fock_shaped() {
        let overlap = DMatrix::from_row_slice(2, 2, &[1.0, 0.2, 0.2, 1.0]);
        let c_lo = DMatrix::from_row_slice(2, 1, &[0.8, 0.3]);
        let kappa = DMatrix::from_element(1, 1, 2.0);
        let lambda = DMatrix::from_element(1, 1, 0.7);

        let h = ao_hamiltonian_correction(&overlap, &c_lo, &kappa, &lambda).unwrap();
        assert_eq!((h.nrows(), h.ncols()), (2, 2));
        assert_relative_eq!(h[(0, 1)], h[(1, 0)], epsilon = 1e-14);
    }

    #[test]
    fn energies_outside_the_window_pass_through() {
        let eps = DVector::from_vec(vec![-1.0, -0.5, 0.4]);
        let coefficients = DMatrix::identity(3, 3);
        let correction = DMatrix::from_diagonal(&DVector::from_vec(vec![0.1, 0.2, 0.3]));
        let window = OrbitalWindow::Range { start: 1, end: 2 };

        let corrected =
            corrected_orbital_energies(&eps, &coefficients, &correction, &window).unwrap();
        assert_relative_eq!(corrected[0], -1.0, epsilon = 1e-14);
        assert_relative_eq!(corrected[1], -0.3, epsilon = 1e-14);
        assert_relative_eq!(corrected[2], 0.4, epsilon = 1e-14);
    }

    #[test]
    fn channel_shape_mismatch_is_reported() {
        let kappa = DMatrix::zeros(2, 2);
        let lambda = DMatrix::zeros(3, 3);
        let err = energy_correction(&kappa, &lambda).unwrap_err();
        assert!(matches!(err, LoscError::DimensionMismatch { .. }));
    }
}
