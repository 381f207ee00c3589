//! Local occupation of the localized orbitals.

use nalgebra::DMatrix;

use crate::error::{expect_shape, LoscError};

/// Project a spin channel's density matrix into the localized-orbital basis:
/// lambda = C_lo^T S D S C_lo.
///
/// The trace of the result equals the channel's electron count. Diagonal
/// entries lie in [0, 1] for a converged physical density; transient
/// violations for pathological densities are not an error.
pub fn local_occupation(
    lo_coefficients: &DMatrix<f64>,
    overlap: &DMatrix<f64>,
    density: &DMatrix<f64>,
) -> Result<DMatrix<f64>, LoscError> {
    let nbf = overlap.nrows();
    expect_shape("overlap matrix", overlap, nbf, nbf)?;
    expect_shape("density matrix", density, nbf, nbf)?;
    expect_shape(
        "LO coefficient matrix",
        lo_coefficients,
        nbf,
        lo_coefficients.ncols(),
    )?;

    let projected = overlap * lo_coefficients;
    Ok(projected.transpose() * density * projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    #[test]
    fn trace_recovers_electron_count() {
        // Two S-orthonormal orbitals, fractionally occupied.
        let c = DMatrix::from_row_slice(
            2,
            2,
            &[
                1.0 / 2.0_f64.sqrt(),
                1.0 / 2.0_f64.sqrt(),
                1.0 / 2.0_f64.sqrt(),
                -1.0 / 2.0_f64.sqrt(),
            ],
        );
        let s = DMatrix::identity(2, 2);
        let occ = DVector::from_vec(vec![1.0, 0.3]);
        let mut density = DMatrix::zeros(2, 2);
        for i in 0..2 {
            let ci = c.column(i);
            density += (ci * ci.transpose()) * occ[i];
        }

        let lambda = local_occupation(&c, &s, &density).unwrap();
        assert_relative_eq!(lambda.trace(), 1.3, epsilon = 1e-12);
        assert_relative_eq!(lambda[(0, 1)], lambda[(1, 0)], epsilon = 1e-12);
    }

    #[test]
    fn covariant_under_common_rotation() {
        // Rotating the orbitals and conjugating the occupation with the same
        // unitary must agree: lambda(C U, D) = U^T lambda(C, D) U.
        let c = DMatrix::from_row_slice(2, 2, &[0.9, 0.2, -0.1, 1.1]);
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 0.15, 0.15, 1.0]);
        let density = DMatrix::from_row_slice(2, 2, &[0.8, 0.1, 0.1, 0.4]);

        let theta: f64 = 0.37;
        let u = DMatrix::from_row_slice(
            2,
            2,
            &[theta.cos(), -theta.sin(), theta.sin(), theta.cos()],
        );

        let rotated = local_occupation(&(&c * &u), &s, &density).unwrap();
        let conjugated = u.transpose() * local_occupation(&c, &s, &density).unwrap() * &u;
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(rotated[(i, j)], conjugated[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let c = DMatrix::zeros(3, 2);
        let s = DMatrix::identity(2, 2);
        let d = DMatrix::zeros(2, 2);
        let err = local_occupation(&c, &s, &d).unwrap_err();
        assert!(matches!(err, LoscError::DimensionMismatch { .. }));
    }
}
