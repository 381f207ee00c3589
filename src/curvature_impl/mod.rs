//! LOSC curvature matrices.
//!
//! The curvature approximates the second derivative of the
//! exchange-correlation-plus-exact-exchange energy with respect to
//! simultaneous occupation changes of two localized orbitals. The
//! exact-exchange-like piece comes from density fitting, the
//! density-functional piece from grid quadrature; the DFA's exchange
//! weights set the balance.

mod v1;
mod v2;

#[cfg(test)]
mod tests;

pub use v1::CurvatureV1;
pub use v2::CurvatureV2;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::dfa::DfaDescriptor;
use crate::error::{expect_shape, LoscError};

/// Inputs shared by every curvature kernel, for one spin channel.
#[derive(Debug, Clone, Copy)]
pub struct CurvatureInput<'a> {
    pub dfa: &'a DfaDescriptor,
    /// Three-center density-fitting tensor `(p|ii)`, `nfit x nlo`.
    pub df_pii: &'a DMatrix<f64>,
    /// Inverse of the two-index fitting metric, `nfit x nfit`.
    pub df_metric_inverse: &'a DMatrix<f64>,
    /// Localized-orbital values on the grid, `npts x nlo`.
    pub grid_lo: &'a DMatrix<f64>,
    /// Grid quadrature weights, `npts`.
    pub grid_weights: &'a DVector<f64>,
}

impl CurvatureInput<'_> {
    pub fn orbital_count(&self) -> usize {
        self.df_pii.ncols()
    }

    pub(crate) fn validate(&self) -> Result<(), LoscError> {
        let nfit = self.df_pii.nrows();
        let nlo = self.df_pii.ncols();
        let npts = self.grid_weights.len();
        expect_shape("density fitting <p|ii> tensor", self.df_pii, nfit, nlo)?;
        expect_shape(
            "density fitting metric inverse",
            self.df_metric_inverse,
            nfit,
            nfit,
        )?;
        expect_shape("grid values of localized orbitals", self.grid_lo, npts, nlo)?;
        Ok(())
    }
}

/// Contract every curvature kernel satisfies: a single-pass construction of
/// a symmetric `nlo x nlo` matrix, no internal iteration.
pub trait CurvatureKernel {
    fn kappa(&self, input: &CurvatureInput<'_>) -> Result<DMatrix<f64>, LoscError>;
}

/// Coulomb-like piece `<ii|jj>` in the fitting basis.
fn kappa_coulomb(input: &CurvatureInput<'_>) -> DMatrix<f64> {
    let k = input.df_pii.transpose() * input.df_metric_inverse * input.df_pii;
    // The metric inverse is symmetric up to round-off; make the result exact.
    0.5 * (&k + k.transpose())
}

/// Density-functional piece: quadrature of rho_i^{2/3} rho_j^{2/3} over the
/// grid, with rho_i(r) = |phi_i(r)|^2.
fn kappa_xc(input: &CurvatureInput<'_>) -> DMatrix<f64> {
    let nlo = input.orbital_count();
    let npts = input.grid_weights.len();

    let mut k = (0..npts)
        .into_par_iter()
        .fold(
            || DMatrix::zeros(nlo, nlo),
            |mut acc: DMatrix<f64>, p| {
                let w = input.grid_weights[p];
                let vals: Vec<f64> = (0..nlo)
                    .map(|i| input.grid_lo[(p, i)].abs().powf(4.0 / 3.0))
                    .collect();
                for i in 0..nlo {
                    for j in 0..=i {
                        acc[(i, j)] += w * vals[i] * vals[j];
                    }
                }
                acc
            },
        )
        .reduce(|| DMatrix::zeros(nlo, nlo), |a, b| a + b);

    mirror_lower(&mut k);
    k
}

/// Weighted absolute overlap of the localized orbitals on the grid.
fn absolute_overlap(input: &CurvatureInput<'_>) -> DMatrix<f64> {
    let nlo = input.orbital_count();
    let npts = input.grid_weights.len();

    let mut s = (0..npts)
        .into_par_iter()
        .fold(
            || DMatrix::zeros(nlo, nlo),
            |mut acc: DMatrix<f64>, p| {
                let w = input.grid_weights[p];
                for i in 0..nlo {
                    for j in 0..=i {
                        acc[(i, j)] += w * (input.grid_lo[(p, i)] * input.grid_lo[(p, j)]).abs();
                    }
                }
                acc
            },
        )
        .reduce(|| DMatrix::zeros(nlo, nlo), |a, b| a + b);

    mirror_lower(&mut s);
    s
}

fn mirror_lower(m: &mut DMatrix<f64>) {
    for i in 0..m.nrows() {
        for j in 0..i {
            m[(j, i)] = m[(i, j)];
        }
    }
}
