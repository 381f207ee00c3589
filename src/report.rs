//! Formatted summaries of a correction run.

use tracing::info;

use crate::result::LoscResult;
use crate::units::EnergyUnit;

pub fn report_total_energies(result: &LoscResult) {
    info!("\n==> LOSC Energy Decomposition <==");
    info!(
        "  Functional total energy:  {:.10} au",
        result.dfa_total_energy
    );
    info!(
        "  LOSC correction:          {:.10} au",
        result.energy_correction
    );
    info!(
        "  Corrected total energy:   {:.10} au",
        result.corrected_total_energy
    );
}

pub fn report_orbital_energies(result: &LoscResult) {
    let unit = match result.metadata.orbital_energy_unit {
        EnergyUnit::Hartree => "au",
        EnergyUnit::ElectronVolt => "eV",
    };
    info!("\n==> Orbital Energies ({unit}) <==");
    info!("  {:>4}  {:>14}  {:>14}", "MO", "functional", "corrected");
    for spin in 0..result.spin_channels() {
        info!("  Spin channel {spin}:");
        let window = &result.metadata.windows[spin];
        let dfa = &result.dfa_orbital_energies[spin];
        let corrected = &result.corrected_orbital_energies[spin];
        for i in 0..dfa.len() {
            let marker = if window.indices(dfa.len()).contains(&i) {
                "*"
            } else {
                " "
            };
            info!(
                "  {:>4}{} {:>14.6}  {:>14.6}",
                i, marker, dfa[i], corrected[i]
            );
        }
    }
    info!("  (* inside the localization window)");
}
