// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Development orchestration: settings in, finished reservoir out.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use liquidstate_engine::Reservoir;

use crate::connectivity;
use crate::error::GenesisResult;
use crate::settings::ReservoirSettings;
use crate::spectral::{self, SpectralScope};
use crate::topology;

/// Build a complete reservoir from resolved settings.
///
/// Stages run in strict order - topology growth, input wiring, recurrent
/// wiring, delay assignment, spectral scaling - and any error aborts the
/// whole build; a partially constructed reservoir is never returned. All
/// stochastic decisions draw from the single seeded source, so an identical
/// seed reproduces an identical reservoir.
pub fn develop(settings: &ReservoirSettings, seed: u64) -> GenesisResult<Reservoir> {
    let mut rng = StdRng::seed_from_u64(seed);

    let topology = topology::grow(settings, &mut rng)?;

    let mut input_bank = connectivity::wire_inputs(&topology, settings, &mut rng)?;
    connectivity::assign_delays(&mut input_bank, &topology, &settings.input_delays, &mut rng);

    let mut recurrent_bank = connectivity::wire_recurrent(&topology, settings, &mut rng)?;
    connectivity::assign_delays(
        &mut recurrent_bank,
        &topology,
        &settings.recurrent_delays,
        &mut rng,
    );

    if let Some(targets) = settings.spectral_radius {
        match (targets.analog, targets.spiking) {
            // Equal targets collapse into one pass over the whole bank.
            (Some(analog), Some(spiking)) if analog == spiking => {
                spectral::normalize(
                    &mut recurrent_bank,
                    &topology.neurons,
                    SpectralScope::All,
                    analog,
                )?;
            }
            (analog, spiking) => {
                if let Some(radius) = analog {
                    spectral::normalize(
                        &mut recurrent_bank,
                        &topology.neurons,
                        SpectralScope::Analog,
                        radius,
                    )?;
                }
                if let Some(radius) = spiking {
                    spectral::normalize(
                        &mut recurrent_bank,
                        &topology.neurons,
                        SpectralScope::Spiking,
                        radius,
                    )?;
                }
            }
        }
    }

    info!(
        target: "liquid-genesis",
        seed,
        neurons = topology.neurons.len(),
        input_synapses = input_bank.len(),
        recurrent_synapses = recurrent_bank.len(),
        "reservoir developed"
    );

    Ok(Reservoir::assemble(
        topology.neurons,
        topology.pools,
        input_bank,
        recurrent_bank,
        settings.input_count,
        settings.augmented_predictors,
    ))
}
