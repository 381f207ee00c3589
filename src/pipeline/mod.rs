//! The correction pipelines.
//!
//! `post_scf_losc` applies the correction once on top of a fixed reference;
//! `scf_losc` feeds it back into the external solver and re-solves to
//! self-consistency. Both validate every precondition before touching a
//! collaborator, so a failing call does no numeric work and leaves no
//! partial state.

mod post_scf;
mod self_consistent;


pub use post_scf::post_scf_losc;
pub use self_consistent::{scf_losc, ScfLoscOutput};

use crate::config::{ResolvedSettings, SpinReference};
use crate::error::LoscError;
use crate::wavefunction::WavefunctionSnapshot;

/// Precondition checks shared by both pipelines.
fn validate_snapshot(
    snapshot: &WavefunctionSnapshot,
    settings: &ResolvedSettings,
) -> Result<(), LoscError> {
    if !snapshot.symmetry.eq_ignore_ascii_case("c1") {
        return Err(LoscError::UnsupportedSymmetry(snapshot.symmetry.clone()));
    }

    let declared_restricted = settings.reference == SpinReference::Restricted;
    if snapshot.restricted != declared_restricted {
        return Err(LoscError::ReferenceMismatch {
            snapshot_restricted: snapshot.restricted,
        });
    }

    let functional = &snapshot.functional;
    let unsupported = |reason: &str| {
        Err(LoscError::UnsupportedFunctional {
            name: functional.name.clone(),
            reason: reason.to_string(),
        })
    };
    if functional.range_separated_exchange {
        return unsupported("range-separated exchange functionals are not supported");
    }
    if functional.double_hybrid {
        return unsupported("double hybrid functionals are not supported");
    }
    if functional.meta_gga {
        return unsupported("meta-GGA functionals are not supported");
    }

    snapshot.validate_shapes()
}
