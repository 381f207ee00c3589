//! Read-only view of a converged mean-field solution.
//!
//! The snapshot is produced by the external solver and borrowed by the
//! pipeline; nothing here is ever mutated. Spin channels are stored as
//! per-channel vectors: one channel for a restricted (spin-degenerate)
//! treatment, two (alpha, beta) for unrestricted.

use nalgebra::{DMatrix, DVector};

use crate::error::{expect_shape, LoscError};

/// Feature flags of the parent functional, as reported by the solver.
///
/// LOSC is defined for LDA/GGA/global-hybrid functionals only; the flags let
/// the pipeline reject the unsupported families before any numeric work.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalFeatures {
    pub name: String,
    pub range_separated_exchange: bool,
    pub double_hybrid: bool,
    pub meta_gga: bool,
}

impl FunctionalFeatures {
    /// A plain LDA/GGA/global-hybrid functional with none of the
    /// unsupported traits.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range_separated_exchange: false,
            double_hybrid: false,
            meta_gga: false,
        }
    }
}

/// Caller-supplied occupation overrides, per spin channel and orbital.
///
/// Absent overrides mean the canonical aufbau assignment. The overrides are
/// an explicit, optional field of the snapshot and an explicit input to the
/// occupation derivation; the pipeline never attaches run-scoped state to a
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomOccupation {
    overrides: Vec<(usize, usize, f64)>,
}

impl CustomOccupation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the occupation of one orbital in one spin channel. Replaces any
    /// earlier override for the same orbital.
    pub fn set(&mut self, spin: usize, orbital: usize, occupation: f64) {
        if let Some(entry) = self
            .overrides
            .iter_mut()
            .find(|(s, o, _)| *s == spin && *o == orbital)
        {
            entry.2 = occupation;
        } else {
            self.overrides.push((spin, orbital, occupation));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    fn apply(&self, spin: usize, occupations: &mut DVector<f64>) {
        for &(s, orbital, value) in &self.overrides {
            if s == spin && orbital < occupations.len() {
                occupations[orbital] = value;
            }
        }
    }
}

/// Converged mean-field solution, as handed over by the external solver.
///
/// Invariants: coefficient matrices are basis-count x orbital-count, the
/// overlap is square symmetric positive definite, densities are symmetric.
/// Electron counts per channel may be fractional.
#[derive(Debug, Clone)]
pub struct WavefunctionSnapshot {
    /// Per-spin orbital coefficients, `nbf x nmo`, energy ordered.
    pub coefficients: Vec<DMatrix<f64>>,
    /// Per-spin Fock (or core Hamiltonian) matrices in the AO basis.
    pub fock: Vec<DMatrix<f64>>,
    /// Per-spin canonical orbital energies in hartree, ascending.
    pub orbital_energies: Vec<DVector<f64>>,
    /// AO overlap matrix.
    pub overlap: DMatrix<f64>,
    /// Per-spin AO density matrices.
    pub density: Vec<DMatrix<f64>>,
    /// Converged total energy in hartree.
    pub total_energy: f64,
    /// Electrons per spin channel; fractional values are allowed.
    pub electrons: Vec<f64>,
    /// Restricted (spin-degenerate) vs unrestricted treatment.
    pub restricted: bool,
    /// Schoenflies symbol of the molecular point group.
    pub symmetry: String,
    pub functional: FunctionalFeatures,
    /// Occupation overrides, if the calculation used a non-aufbau or
    /// fractional assignment.
    pub occupation: Option<CustomOccupation>,
}

impl WavefunctionSnapshot {
    pub fn spin_channels(&self) -> usize {
        if self.restricted {
            1
        } else {
            2
        }
    }

    pub fn basis_size(&self) -> usize {
        self.overlap.nrows()
    }

    pub fn has_custom_occupation(&self) -> bool {
        self.occupation.as_ref().is_some_and(|occ| !occ.is_empty())
    }

    /// Per-orbital occupation numbers for one spin channel: the aufbau
    /// filling of the declared electron count, with any caller overrides
    /// applied on top.
    pub fn occupation_vector(&self, spin: usize) -> DVector<f64> {
        let n_orbitals = self.coefficients[spin].ncols();
        let mut occupations = aufbau_occupations(n_orbitals, self.electrons[spin]);
        if let Some(custom) = &self.occupation {
            custom.apply(spin, &mut occupations);
        }
        occupations
    }

    /// Electron count of one spin channel after occupation overrides.
    pub fn channel_electrons(&self, spin: usize) -> f64 {
        self.occupation_vector(spin).sum()
    }

    pub(crate) fn validate_shapes(&self) -> Result<(), LoscError> {
        let nspin = self.spin_channels();
        let nbf = self.basis_size();

        for (name, len) in [
            ("coefficient spin channels", self.coefficients.len()),
            ("Fock spin channels", self.fock.len()),
            ("orbital energy spin channels", self.orbital_energies.len()),
            ("density spin channels", self.density.len()),
            ("electron count spin channels", self.electrons.len()),
        ] {
            if len != nspin {
                return Err(LoscError::DimensionMismatch {
                    name,
                    expected_rows: nspin,
                    expected_cols: 1,
                    rows: len,
                    cols: 1,
                });
            }
        }

        expect_shape("overlap matrix", &self.overlap, nbf, nbf)?;
        for spin in 0..nspin {
            let nmo = self.coefficients[spin].ncols();
            expect_shape("orbital coefficients", &self.coefficients[spin], nbf, nmo)?;
            expect_shape("Fock matrix", &self.fock[spin], nbf, nbf)?;
            expect_shape("density matrix", &self.density[spin], nbf, nbf)?;
            if self.orbital_energies[spin].len() != nmo {
                return Err(LoscError::DimensionMismatch {
                    name: "orbital energies",
                    expected_rows: nmo,
                    expected_cols: 1,
                    rows: self.orbital_energies[spin].len(),
                    cols: 1,
                });
            }
        }
        Ok(())
    }
}

/// Ground-state filling: lowest orbitals first, at most one electron per
/// orbital per spin channel, fractional remainder on the frontier orbital.
fn aufbau_occupations(n_orbitals: usize, electrons: f64) -> DVector<f64> {
    let mut occupations = DVector::zeros(n_orbitals);
    let mut remaining = electrons;
    for i in 0..n_orbitals {
        if remaining <= 0.0 {
            break;
        }
        occupations[i] = remaining.min(1.0);
        remaining -= occupations[i];
    }
    occupations
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aufbau_integer_filling() {
        let occ = aufbau_occupations(4, 2.0);
        assert_eq!(occ.as_slice(), &[1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn aufbau_fractional_frontier() {
        let occ = aufbau_occupations(4, 1.5);
        assert_relative_eq!(occ[0], 1.0);
        assert_relative_eq!(occ[1], 0.5);
        assert_relative_eq!(occ.sum(), 1.5);
    }

    #[test]
    fn overrides_replace_aufbau_entries() {
        let mut custom = CustomOccupation::new();
        custom.set(0, 1, 0.0);
        custom.set(0, 2, 1.0);
        custom.set(0, 2, 0.25);

        let mut occ = aufbau_occupations(4, 2.0);
        custom.apply(0, &mut occ);
        assert_eq!(occ.as_slice(), &[1.0, 0.0, 0.25, 0.0]);
    }
}
