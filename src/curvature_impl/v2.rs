//! Second curvature kernel.
//!
//! Starts from the first kernel and screens the off-diagonal entries by the
//! spatial overlap of the two localized orbitals: strongly overlapping pairs
//! are pushed towards the geometric mean of the diagonal curvatures, well
//! separated pairs keep their first-kernel value.

use libm::{erf, erfc};
use nalgebra::DMatrix;

use super::{absolute_overlap, CurvatureInput, CurvatureKernel, CurvatureV1};
use crate::error::LoscError;

pub struct CurvatureV2 {
    tau: f64,
    zeta: f64,
}

impl CurvatureV2 {
    pub fn new(tau: f64, zeta: f64) -> Self {
        Self { tau, zeta }
    }
}

impl Default for CurvatureV2 {
    fn default() -> Self {
        Self::new(1.2378, 8.0)
    }
}

impl CurvatureKernel for CurvatureV2 {
    /// kappa_2[ij] = erf(zeta * S[ij]) * sqrt(|kappa_1[ii] * kappa_1[jj]|)
    ///             + erfc(zeta * S[ij]) * kappa_1[ij],
    /// with S the weighted absolute LO overlap on the grid and the diagonal
    /// taken over from kappa_1 unchanged.
    fn kappa(&self, input: &CurvatureInput<'_>) -> Result<DMatrix<f64>, LoscError> {
        input.validate()?;
        let s_lo = absolute_overlap(input);
        let kappa1 = CurvatureV1::new(self.tau).kappa(input)?;

        let nlo = input.orbital_count();
        let mut kappa2 = DMatrix::zeros(nlo, nlo);
        for i in 0..nlo {
            let k1_ii = kappa1[(i, i)];
            kappa2[(i, i)] = k1_ii;
            for j in 0..i {
                let f = self.zeta * s_lo[(i, j)];
                let k1_jj = kappa1[(j, j)];
                let blended =
                    erf(f) * (k1_ii * k1_jj).abs().sqrt() + erfc(f) * kappa1[(i, j)];
                kappa2[(i, j)] = blended;
                kappa2[(j, i)] = blended;
            }
        }
        Ok(kappa2)
    }
}
