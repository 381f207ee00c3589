//! Configuration for LOSC calculations.
//!
//! Settings are plain serde structures with optional fields; missing values
//! are filled by `with_defaults` or read through the accessor methods.
//! Algorithm versions stay raw integers until `resolve()` turns them into
//! the closed variant enums; an unknown version is a validation error, not a
//! runtime fallback.

use serde::{Deserialize, Serialize};

use crate::error::LoscError;
use crate::units::EnergyUnit;

/// Spin treatment the caller declares for the calculation. Must agree with
/// the snapshot's restricted/unrestricted flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinReference {
    Restricted,
    Unrestricted,
}

/// Main configuration structure for LOSC calculations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoscSettings {
    pub reference: Option<SpinReference>,
    pub orbital_energy_unit: Option<EnergyUnit>,
    pub localizer: Option<LocalizerParams>,
    pub curvature: Option<CurvatureParams>,
}

/// Localization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizerParams {
    pub version: Option<u32>,
    pub v2_parameter_c: Option<f64>,
    pub v2_parameter_gamma: Option<f64>,
    pub max_iter: Option<usize>,
    pub convergence: Option<f64>,
    pub random_permutation: Option<bool>,
}

impl Default for LocalizerParams {
    fn default() -> Self {
        LocalizerParams {
            version: Some(2),
            v2_parameter_c: Some(1000.0),
            v2_parameter_gamma: Some(0.707),
            max_iter: Some(100),
            convergence: Some(1e-10),
            random_permutation: Some(false),
        }
    }
}

impl LocalizerParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.version.is_none() {
            self.version = defaults.version;
        }
        if self.v2_parameter_c.is_none() {
            self.v2_parameter_c = defaults.v2_parameter_c;
        }
        if self.v2_parameter_gamma.is_none() {
            self.v2_parameter_gamma = defaults.v2_parameter_gamma;
        }
        if self.max_iter.is_none() {
            self.max_iter = defaults.max_iter;
        }
        if self.convergence.is_none() {
            self.convergence = defaults.convergence;
        }
        if self.random_permutation.is_none() {
            self.random_permutation = defaults.random_permutation;
        }
        self
    }
}

/// Curvature parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvatureParams {
    pub version: Option<u32>,
    pub v1_parameter_tau: Option<f64>,
    pub v2_parameter_tau: Option<f64>,
    pub v2_parameter_zeta: Option<f64>,
}

impl Default for CurvatureParams {
    fn default() -> Self {
        CurvatureParams {
            version: Some(2),
            v1_parameter_tau: Some(1.2378),
            v2_parameter_tau: Some(1.2378),
            v2_parameter_zeta: Some(8.0),
        }
    }
}

impl CurvatureParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.version.is_none() {
            self.version = defaults.version;
        }
        if self.v1_parameter_tau.is_none() {
            self.v1_parameter_tau = defaults.v1_parameter_tau;
        }
        if self.v2_parameter_tau.is_none() {
            self.v2_parameter_tau = defaults.v2_parameter_tau;
        }
        if self.v2_parameter_zeta.is_none() {
            self.v2_parameter_zeta = defaults.v2_parameter_zeta;
        }
        self
    }
}

/// Localizer variant with its parameter set, fixed at validation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalizerKind {
    V2 {
        c: f64,
        gamma: f64,
        max_iter: usize,
        convergence: f64,
        random_permutation: bool,
    },
}

/// Curvature variant with its parameter set, fixed at validation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurvatureKind {
    V1 { tau: f64 },
    V2 { tau: f64, zeta: f64 },
}

/// Settings after validation: every value concrete, algorithm versions
/// dispatched into their closed variants.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub reference: SpinReference,
    pub orbital_energy_unit: EnergyUnit,
    pub localizer: LocalizerKind,
    pub curvature: CurvatureKind,
}

impl LoscSettings {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        if self.reference.is_none() {
            self.reference = Some(SpinReference::Restricted);
        }
        if self.orbital_energy_unit.is_none() {
            self.orbital_energy_unit = Some(EnergyUnit::default());
        }
        self.localizer = Some(self.localizer.take().unwrap_or_default().with_defaults());
        self.curvature = Some(self.curvature.take().unwrap_or_default().with_defaults());
        self
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, LoscError> {
        let settings = serde_yml::from_str::<LoscSettings>(text)
            .map_err(|e| LoscError::InvalidConfiguration(e.to_string()))?;
        Ok(settings.with_defaults())
    }

    pub fn from_yaml_path(path: impl AsRef<std::path::Path>) -> Result<Self, LoscError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LoscError::InvalidConfiguration(e.to_string()))?;
        Self::from_yaml_str(&text)
    }

    /// Validate the settings and dispatch algorithm versions. Runs before
    /// any numeric work; unknown versions fail here.
    pub fn resolve(&self) -> Result<ResolvedSettings, LoscError> {
        let complete = self.clone().with_defaults();
        let localizer_params = complete.localizer.unwrap_or_default();
        let curvature_params = complete.curvature.unwrap_or_default();

        let localizer = match localizer_params.version.unwrap_or(2) {
            2 => LocalizerKind::V2 {
                c: localizer_params.v2_parameter_c.unwrap_or(1000.0),
                gamma: localizer_params.v2_parameter_gamma.unwrap_or(0.707),
                max_iter: localizer_params.max_iter.unwrap_or(100),
                convergence: localizer_params.convergence.unwrap_or(1e-10),
                random_permutation: localizer_params.random_permutation.unwrap_or(false),
            },
            other => return Err(LoscError::UnsupportedLocalizerVersion(other)),
        };

        let curvature = match curvature_params.version.unwrap_or(2) {
            1 => CurvatureKind::V1 {
                tau: curvature_params.v1_parameter_tau.unwrap_or(1.2378),
            },
            2 => CurvatureKind::V2 {
                tau: curvature_params.v2_parameter_tau.unwrap_or(1.2378),
                zeta: curvature_params.v2_parameter_zeta.unwrap_or(8.0),
            },
            other => return Err(LoscError::UnsupportedCurvatureVersion(other)),
        };

        Ok(ResolvedSettings {
            reference: complete.reference.unwrap_or(SpinReference::Restricted),
            orbital_energy_unit: complete.orbital_energy_unit.unwrap_or_default(),
            localizer,
            curvature,
        })
    }
}
