//! Description of the parent density functional approximation.

/// Exchange composition of the parent DFA.
///
/// The curvature kernels need to know how much of the exchange energy tracks
/// exact (Hartree-Fock style) exchange and how much tracks LDA/GGA exchange.
/// Extracting these weights from a solver's functional object is unreliable
/// across solvers, so the caller supplies them explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct DfaDescriptor {
    dfa_exchange: f64,
    hf_exchange: f64,
    name: String,
}

impl DfaDescriptor {
    /// `dfa_exchange` is the total weight of LDA/GGA type exchange,
    /// `hf_exchange` the weight of exact exchange.
    pub fn new(dfa_exchange: f64, hf_exchange: f64, name: impl Into<String>) -> Self {
        Self {
            dfa_exchange,
            hf_exchange,
            name: name.into(),
        }
    }

    pub fn b3lyp() -> Self {
        Self::new(0.8, 0.2, "B3LYP")
    }

    pub fn svwn() -> Self {
        Self::new(1.0, 0.0, "SVWN")
    }

    pub fn blyp() -> Self {
        Self::new(1.0, 0.0, "BLYP")
    }

    pub fn pbe() -> Self {
        Self::new(1.0, 0.0, "PBE")
    }

    /// Generic pure GGA functional.
    pub fn gga() -> Self {
        Self::new(1.0, 0.0, "Pure GGA functional")
    }

    pub fn pbe0() -> Self {
        Self::new(0.75, 0.25, "PBE0")
    }

    pub fn dfa_exchange(&self) -> f64 {
        self.dfa_exchange
    }

    pub fn hf_exchange(&self) -> f64 {
        self.hf_exchange
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
