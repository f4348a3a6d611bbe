// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reservoir health metrics.
//!
//! Aggregated from per-neuron activity statistics and the synapse banks;
//! consumed by external monitoring/reporting. Collection never mutates the
//! reservoir.

use serde::{Deserialize, Serialize};

use liquidstate_neural::neuron::ActivationKind;
use liquidstate_neural::{Neuron, RunningStat};

use crate::reservoir::Reservoir;

/// Output excursions below this magnitude count as silence.
const SILENT_EPSILON: f64 = 1e-6;
/// Analog neurons whose output RMS exceeds this are considered saturated.
const SATURATION_RMS: f64 = 0.99;
/// Spiking neurons firing in more than this fraction of cycles are
/// considered constantly firing.
const HYPERACTIVE_RATE: f64 = 0.95;

/// Compact distribution summary of a value population.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

impl StatSummary {
    pub fn from_samples(samples: impl Iterator<Item = f64>) -> Self {
        let mut stat = RunningStat::new();
        for sample in samples {
            stat.push(sample);
        }
        Self {
            count: stat.count(),
            min: stat.min(),
            max: stat.max(),
            mean: stat.mean(),
            stdev: stat.stdev(),
        }
    }
}

/// Aggregate health report over the current statistics window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservoirStatistics {
    pub neuron_count: usize,
    pub pool_count: usize,
    pub input_synapse_count: usize,
    pub recurrent_synapse_count: usize,
    /// Completed cycles since construction or the last reset.
    pub cycles: u64,

    /// Fraction of neurons with no output excursion (analog) or zero fires
    /// (spiking) in the window.
    pub silent_fraction: f64,
    /// Fraction of analog neurons railing at their activation bounds.
    pub saturated_fraction: f64,
    /// Fraction of spiking neurons firing on nearly every cycle.
    pub constantly_firing_fraction: f64,

    /// Weight distribution across both banks.
    pub weights: StatSummary,
    /// Current efficacy distribution across dynamic synapses.
    pub efficacies: StatSummary,
}

impl ReservoirStatistics {
    pub(crate) fn collect(reservoir: &Reservoir) -> Self {
        let neurons = reservoir.neurons();
        let observed = neurons.iter().filter(|n| n.stats.cycles > 0).count();

        let silent = neurons.iter().filter(|n| is_silent(n)).count();
        let saturated = neurons.iter().filter(|n| is_saturated(n)).count();
        let hyperactive = neurons.iter().filter(|n| is_constantly_firing(n)).count();

        let fraction = |count: usize| {
            if observed == 0 {
                0.0
            } else {
                count as f64 / observed as f64
            }
        };

        let weights = StatSummary::from_samples(
            reservoir
                .input_bank()
                .iter()
                .chain(reservoir.recurrent_bank().iter())
                .map(|syn| syn.weight()),
        );
        let efficacies = StatSummary::from_samples(
            reservoir
                .input_bank()
                .iter()
                .chain(reservoir.recurrent_bank().iter())
                .filter(|syn| syn.is_dynamic())
                .map(|syn| syn.efficacy()),
        );

        Self {
            neuron_count: neurons.len(),
            pool_count: reservoir.pools().len(),
            input_synapse_count: reservoir.input_bank().len(),
            recurrent_synapse_count: reservoir.recurrent_bank().len(),
            cycles: reservoir.cycle(),
            silent_fraction: fraction(silent),
            saturated_fraction: fraction(saturated),
            constantly_firing_fraction: fraction(hyperactive),
            weights,
            efficacies,
        }
    }
}

fn is_silent(neuron: &Neuron) -> bool {
    if neuron.stats.cycles == 0 {
        return false;
    }
    match neuron.kind() {
        ActivationKind::Spiking => neuron.stats.fires == 0,
        ActivationKind::Analog => {
            neuron.stats.output.min().abs() < SILENT_EPSILON
                && neuron.stats.output.max().abs() < SILENT_EPSILON
        }
    }
}

fn is_saturated(neuron: &Neuron) -> bool {
    neuron.stats.cycles > 0
        && neuron.kind() == ActivationKind::Analog
        && neuron.stats.output.rms() > SATURATION_RMS
}

fn is_constantly_firing(neuron: &Neuron) -> bool {
    neuron.stats.cycles > 0
        && neuron.kind() == ActivationKind::Spiking
        && neuron.stats.firing_rate() > HYPERACTIVE_RATE
}

impl std::fmt::Display for ReservoirStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Neurons: {} in {} pools, Synapses: {} input + {} recurrent, \
             Cycles: {}, Silent: {:.1}%, Saturated: {:.1}%, Constantly firing: {:.1}%, \
             Weights: [{:.4}, {:.4}] mean {:.4}",
            self.neuron_count,
            self.pool_count,
            self.input_synapse_count,
            self.recurrent_synapse_count,
            self.cycles,
            self.silent_fraction * 100.0,
            self.saturated_fraction * 100.0,
            self.constantly_firing_fraction * 100.0,
            self.weights.min,
            self.weights.max,
            self.weights.mean,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquidstate_neural::neuron::{
        AnalogActivation, NeuronModel, NeuronRole, Placement,
    };
    use liquidstate_neural::types::{InputId, NeuronId, PoolId};
    use liquidstate_neural::{Synapse, SynapseBank};
    use liquidstate_neural::synapse::SynapseSource;

    fn analog_neuron(index: u32, bias: f64) -> Neuron {
        Neuron::new(
            NeuronRole::Excitatory,
            NeuronModel::Analog { activation: AnalogActivation::Tanh, retainment: 0.0 },
            Placement {
                pool: PoolId(0),
                index_in_pool: index,
                reservoir_index: NeuronId(index),
                position: (index as i32, 0, 0),
            },
            bias,
            false,
        )
        .unwrap()
    }

    #[test]
    fn silent_and_saturated_neurons_are_classified() {
        // Neuron 0 has no drive at all; neuron 1 rails at tanh(+8) ~ 1.0.
        let neurons = vec![analog_neuron(0, 0.0), analog_neuron(1, 8.0)];
        let mut input_bank = SynapseBank::new(2);
        input_bank.try_insert(Synapse::fixed(
            SynapseSource::Input(InputId(0)),
            NeuronId(1),
            1.0,
        ));
        let recurrent_bank = SynapseBank::new(2);
        let mut reservoir =
            Reservoir::assemble(neurons, Vec::new(), input_bank, recurrent_bank, 1, false);

        for _ in 0..20 {
            reservoir.compute(&[0.5], true);
        }

        let stats = reservoir.collect_statistics();
        assert_eq!(stats.neuron_count, 2);
        assert_eq!(stats.cycles, 20);
        assert_eq!(stats.silent_fraction, 0.5);
        assert_eq!(stats.saturated_fraction, 0.5);
        assert_eq!(stats.constantly_firing_fraction, 0.0);
        assert_eq!(stats.weights.count, 1);
    }

    #[test]
    fn statistics_survive_structural_reset_only() {
        let neurons = vec![analog_neuron(0, 1.0)];
        let mut reservoir = Reservoir::assemble(
            neurons,
            Vec::new(),
            SynapseBank::new(1),
            SynapseBank::new(1),
            0,
            false,
        );
        for _ in 0..5 {
            reservoir.compute(&[], true);
        }
        reservoir.reset(false);
        assert_eq!(reservoir.neurons()[0].stats.cycles, 5);
        reservoir.reset(true);
        assert_eq!(reservoir.neurons()[0].stats.cycles, 0);
    }
}
