//! Energy unit handling.
//!
//! Orbital-energy-like outputs are reported either in hartree or in
//! electronvolt; total energies always stay in hartree. One conversion
//! constant is used everywhere so the window selector and the reported
//! orbital energies can never disagree.

use serde::{Deserialize, Serialize};

/// CODATA 2018 hartree-to-electronvolt conversion.
pub const HARTREE_TO_EV: f64 = 27.211_386_245_988;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "au")]
    Hartree,
    #[default]
    #[serde(rename = "eV")]
    ElectronVolt,
}

impl EnergyUnit {
    /// Factor applied to orbital-energy-like quantities (never to total
    /// energies).
    pub fn orbital_energy_factor(self) -> f64 {
        match self {
            EnergyUnit::Hartree => 1.0,
            EnergyUnit::ElectronVolt => HARTREE_TO_EV,
        }
    }
}
