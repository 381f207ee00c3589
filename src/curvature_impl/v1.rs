//! First curvature kernel.

use nalgebra::DMatrix;

use super::{kappa_coulomb, kappa_xc, CurvatureInput, CurvatureKernel};
use crate::error::LoscError;

/// Slater-exchange prefactor (3/4) * (6/pi)^(1/3).
const CX: f64 = 0.930_525_736_349_1;

pub struct CurvatureV1 {
    tau: f64,
}

impl CurvatureV1 {
    pub fn new(tau: f64) -> Self {
        Self { tau }
    }
}

impl Default for CurvatureV1 {
    fn default() -> Self {
        Self::new(1.2378)
    }
}

impl CurvatureKernel for CurvatureV1 {
    /// kappa_1 = (1 - w_hf) * <ii|jj> - tau * Cx * w_dfa * kappa_xc.
    fn kappa(&self, input: &CurvatureInput<'_>) -> Result<DMatrix<f64>, LoscError> {
        input.validate()?;
        let coulomb = kappa_coulomb(input);
        let xc = kappa_xc(input);
        let hf_weight = input.dfa.hf_exchange();
        let dfa_weight = input.dfa.dfa_exchange();
        Ok(coulomb * (1.0 - hf_weight) - xc * (self.tau * CX * dfa_weight))
    }
}
