//! Tests for the localization kernel.

use approx::assert_relative_eq;
use nalgebra::DMatrix;

use super::{LocalizerV2, OrbitalLocalizer};

/// Two canonical orbitals that are even/odd mixtures of two sites.
fn mixed_orbitals() -> DMatrix<f64> {
    let h = 1.0 / 2.0_f64.sqrt();
    DMatrix::from_row_slice(2, 2, &[h, h, h, -h])
}

/// Dipole operator distinguishing the two sites along x.
fn site_dipole() -> [DMatrix<f64>; 3] {
    [
        DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![0.0, 1.0])),
        DMatrix::zeros(2, 2),
        DMatrix::zeros(2, 2),
    ]
}

fn diagonal_hamiltonian() -> DMatrix<f64> {
    DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![-1.0, -0.5]))
}

#[test]
fn recovers_site_localized_orbitals() {
    // gamma = 0: purely spatial objective, so the optimum concentrates each
    // localized orbital on one site.
    let localizer = LocalizerV2::new(1000.0, 0.0)
        .with_max_iter(50)
        .with_convergence(1e-12);
    let result = localizer
        .localize(&mixed_orbitals(), &diagonal_hamiltonian(), &site_dipole())
        .unwrap();

    assert!(result.converged);
    assert!(result.iterations >= 1);
    // Objective for perfectly site-localized orbitals: 0^2 + 1^2 = 1.
    assert_relative_eq!(result.cost, 1.0, epsilon = 1e-8);
    for j in 0..2 {
        let col = result.lo_coefficients.column(j);
        let largest = col.iter().map(|x| x.abs()).fold(0.0, f64::max);
        assert_relative_eq!(largest, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn transform_stays_unitary() {
    let localizer = LocalizerV2::new(1000.0, 0.3)
        .with_max_iter(50)
        .with_convergence(1e-12);
    let result = localizer
        .localize(&mixed_orbitals(), &diagonal_hamiltonian(), &site_dipole())
        .unwrap();

    let u = &result.transform;
    let gram = u.transpose() * u;
    for i in 0..2 {
        for j in 0..2 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(gram[(i, j)], expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn zero_iteration_cap_returns_identity_unconverged() {
    let localizer = LocalizerV2::new(1000.0, 0.0).with_max_iter(0);
    let result = localizer
        .localize(&mixed_orbitals(), &diagonal_hamiltonian(), &site_dipole())
        .unwrap();

    assert!(!result.converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.transform, DMatrix::identity(2, 2));
    assert_eq!(result.lo_coefficients, mixed_orbitals());
}

#[test]
fn random_permutation_reaches_the_same_objective() {
    let localizer = LocalizerV2::new(1000.0, 0.0)
        .with_max_iter(50)
        .with_convergence(1e-12)
        .with_random_permutation(true);
    let result = localizer
        .localize(&mixed_orbitals(), &diagonal_hamiltonian(), &site_dipole())
        .unwrap();

    assert!(result.converged);
    assert_relative_eq!(result.cost, 1.0, epsilon = 1e-8);
}

#[test]
fn shape_mismatch_is_rejected() {
    let localizer = LocalizerV2::new(1000.0, 0.0);
    let bad_hamiltonian = DMatrix::zeros(3, 3);
    let err = localizer
        .localize(&mixed_orbitals(), &bad_hamiltonian, &site_dipole())
        .unwrap_err();
    assert!(matches!(
        err,
        crate::error::LoscError::DimensionMismatch { .. }
    ));
}
