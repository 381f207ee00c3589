//! Tests for the curvature kernels.

use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};

use super::{CurvatureInput, CurvatureKernel, CurvatureV1, CurvatureV2};
use crate::dfa::DfaDescriptor;
use crate::error::LoscError;

struct Fixture {
    dfa: DfaDescriptor,
    df_pii: DMatrix<f64>,
    metric_inverse: DMatrix<f64>,
    grid_lo: DMatrix<f64>,
    grid_weights: DVector<f64>,
}

impl Fixture {
    fn input(&self) -> CurvatureInput<'_> {
        CurvatureInput {
            dfa: &self.dfa,
            df_pii: &self.df_pii,
            df_metric_inverse: &self.metric_inverse,
            grid_lo: &self.grid_lo,
            grid_weights: &self.grid_weights,
        }
    }
}

fn two_orbital_fixture(dfa: DfaDescriptor) -> Fixture {
    Fixture {
        dfa,
        df_pii: DMatrix::from_row_slice(2, 2, &[1.0, 0.4, 0.2, 0.9]),
        metric_inverse: DMatrix::from_row_slice(2, 2, &[1.0, 0.1, 0.1, 0.8]),
        grid_lo: DMatrix::from_row_slice(3, 2, &[0.5, 0.1, 0.3, 0.6, 0.1, 0.4]),
        grid_weights: DVector::from_vec(vec![0.2, 0.5, 0.3]),
    }
}

#[test]
fn coulomb_only_single_orbital_value() {
    // One LO, gga DFA, a grid that contributes nothing: kappa reduces to the
    // density-fitted <ii|ii> value.
    let fixture = Fixture {
        dfa: DfaDescriptor::gga(),
        df_pii: DMatrix::from_element(1, 1, 2.0_f64.sqrt()),
        metric_inverse: DMatrix::identity(1, 1),
        grid_lo: DMatrix::zeros(1, 1),
        grid_weights: DVector::from_vec(vec![1.0]),
    };
    let kappa = CurvatureV1::default().kappa(&fixture.input()).unwrap();
    assert_eq!(kappa.nrows(), 1);
    assert_relative_eq!(kappa[(0, 0)], 2.0, epsilon = 1e-12);
}

#[test]
fn full_exact_exchange_cancels_the_coulomb_piece() {
    // hf weight 1 and dfa weight 0 zero out both contributions.
    let fixture = two_orbital_fixture(DfaDescriptor::new(0.0, 1.0, "HF"));
    let kappa = CurvatureV1::default().kappa(&fixture.input()).unwrap();
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(kappa[(i, j)], 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn kappa_is_symmetric() {
    let fixture = two_orbital_fixture(DfaDescriptor::b3lyp());
    for kernel in [
        Box::new(CurvatureV1::default()) as Box<dyn CurvatureKernel>,
        Box::new(CurvatureV2::default()),
    ] {
        let kappa = kernel.kappa(&fixture.input()).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(kappa[(i, j)], kappa[(j, i)], epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn zero_zeta_collapses_to_the_first_kernel() {
    let fixture = two_orbital_fixture(DfaDescriptor::b3lyp());
    let kappa1 = CurvatureV1::new(1.2378).kappa(&fixture.input()).unwrap();
    let kappa2 = CurvatureV2::new(1.2378, 0.0).kappa(&fixture.input()).unwrap();
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(kappa2[(i, j)], kappa1[(i, j)], epsilon = 1e-12);
        }
    }
}

#[test]
fn large_zeta_pushes_off_diagonals_to_the_geometric_mean() {
    let fixture = two_orbital_fixture(DfaDescriptor::b3lyp());
    let kappa1 = CurvatureV1::new(1.2378).kappa(&fixture.input()).unwrap();
    let kappa2 = CurvatureV2::new(1.2378, 1e6).kappa(&fixture.input()).unwrap();

    assert_relative_eq!(kappa2[(0, 0)], kappa1[(0, 0)], epsilon = 1e-12);
    assert_relative_eq!(kappa2[(1, 1)], kappa1[(1, 1)], epsilon = 1e-12);
    let mean = (kappa1[(0, 0)] * kappa1[(1, 1)]).abs().sqrt();
    assert_relative_eq!(kappa2[(0, 1)], mean, epsilon = 1e-9);
}

#[test]
fn wrong_metric_shape_is_rejected() {
    let mut fixture = two_orbital_fixture(DfaDescriptor::b3lyp());
    fixture.metric_inverse = DMatrix::identity(3, 3);
    let err = CurvatureV1::default().kappa(&fixture.input()).unwrap_err();
    assert!(matches!(err, LoscError::DimensionMismatch { .. }));
}
