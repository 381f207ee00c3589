// Localized Orbital Scaling Correction (LOSC) on top of an external
// mean-field solver. The solver, integral engine, and grid are supplied by
// the caller through the traits in `solver`; this crate owns the correction
// pipeline itself.

pub mod config;
pub mod correction;
pub mod curvature_impl;
pub mod dfa;
pub mod error;
pub mod localizer_impl;
pub mod occupation;
pub mod pipeline;
pub mod report;
pub mod result;
pub mod solver;
pub mod units;
pub mod wavefunction;
pub mod window;

pub use config::{CurvatureKind, LocalizerKind, LoscSettings, SpinReference};
pub use dfa::DfaDescriptor;
pub use error::LoscError;
pub use pipeline::{post_scf_losc, scf_losc, ScfLoscOutput};
pub use result::LoscResult;
pub use solver::{CorrectionPayload, IntegralProvider, SolverDriver, SolverOutput};
pub use units::EnergyUnit;
pub use wavefunction::{CustomOccupation, FunctionalFeatures, WavefunctionSnapshot};
pub use window::OrbitalWindow;
