// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The reservoir object and its cycle execution.

use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use liquidstate_neural::synapse::SynapseSource;
use liquidstate_neural::types::{PoolDimensions, PoolId};
use liquidstate_neural::{Neuron, SynapseBank};

use crate::statistics::ReservoirStatistics;

/// Non-owning partition view: the slice of the flat neuron array belonging
/// to one pool.
#[derive(Debug, Clone)]
pub struct PoolRange {
    pub id: PoolId,
    pub name: String,
    pub dimensions: PoolDimensions,
    pub range: Range<usize>,
}

/// The complete simulated system: all pools, their interconnections, and the
/// per-cycle update machinery.
///
/// Topology is immutable after construction (weights are rescaled at most
/// once, by the builder, before the reservoir is handed out).
pub struct Reservoir {
    neurons: Vec<Neuron>,
    pools: Vec<PoolRange>,
    input_bank: SynapseBank,
    recurrent_bank: SynapseBank,
    /// Readout-eligible neurons in ascending reservoir order (fixed, stable).
    predictor_indices: Vec<usize>,
    augmented_predictors: bool,
    input_count: usize,
    cycle: u64,
    /// Previous-cycle output of every neuron, rebuilt at the start of each
    /// cycle so phase 1 reads a consistent snapshot.
    output_snapshot: Vec<f64>,
}

impl Reservoir {
    /// Assemble a reservoir from construction output.
    ///
    /// Both banks must be sized to the neuron array; the builder guarantees
    /// this, so violations are programming errors rather than results.
    pub fn assemble(
        neurons: Vec<Neuron>,
        pools: Vec<PoolRange>,
        input_bank: SynapseBank,
        recurrent_bank: SynapseBank,
        input_count: usize,
        augmented_predictors: bool,
    ) -> Self {
        assert_eq!(input_bank.num_targets(), neurons.len());
        assert_eq!(recurrent_bank.num_targets(), neurons.len());

        let predictor_indices: Vec<usize> = neurons
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_predictor())
            .map(|(i, _)| i)
            .collect();

        debug!(
            target: "liquid-engine",
            neurons = neurons.len(),
            input_synapses = input_bank.len(),
            recurrent_synapses = recurrent_bank.len(),
            predictors = predictor_indices.len(),
            "reservoir assembled"
        );

        let snapshot_len = neurons.len();
        Self {
            neurons,
            pools,
            input_bank,
            recurrent_bank,
            predictor_indices,
            augmented_predictors,
            input_count,
            cycle: 0,
            output_snapshot: vec![0.0; snapshot_len],
        }
    }

    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    #[inline]
    pub fn pools(&self) -> &[PoolRange] {
        &self.pools
    }

    #[inline]
    pub fn input_bank(&self) -> &SynapseBank {
        &self.input_bank
    }

    #[inline]
    pub fn recurrent_bank(&self) -> &SynapseBank {
        &self.recurrent_bank
    }

    /// Number of input fields this reservoir consumes per cycle.
    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Completed simulation cycles since construction or the last reset.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Width of the predictor vector written by [`copy_predictors_to`].
    ///
    /// [`copy_predictors_to`]: Reservoir::copy_predictors_to
    pub fn predictor_count(&self) -> usize {
        self.predictor_indices.len() * if self.augmented_predictors { 2 } else { 1 }
    }

    /// Run one discrete simulation cycle.
    ///
    /// `input` carries one already-normalized value per declared input
    /// field; a wrong length is a caller contract violation, not a handled
    /// error.
    pub fn compute(&mut self, input: &[f64], update_statistics: bool) {
        debug_assert_eq!(
            input.len(),
            self.input_count,
            "input vector length must match the declared input field count"
        );

        // Freeze the previous cycle's outputs; phase 1 reads only this.
        for (slot, neuron) in self.output_snapshot.iter_mut().zip(&self.neurons) {
            *slot = neuron.output_signal();
        }
        let snapshot = &self.output_snapshot;

        // Phase 1: stimulation collection. Each worker owns a disjoint
        // (neuron, input slot, recurrent slot) triple.
        self.neurons
            .par_iter_mut()
            .zip(self.input_bank.slots_mut().par_iter_mut())
            .zip(self.recurrent_bank.slots_mut().par_iter_mut())
            .for_each(|((neuron, input_slot), recurrent_slot)| {
                let external: f64 = input_slot
                    .iter_mut()
                    .map(|syn| syn.propagate(source_signal(syn.source(), input, snapshot)))
                    .sum();
                let recurrent: f64 = recurrent_slot
                    .iter_mut()
                    .map(|syn| syn.propagate(source_signal(syn.source(), input, snapshot)))
                    .sum();
                neuron.stimulate(external, recurrent);
            });

        // Phase 2: state update. The rayon call boundary is the barrier.
        self.neurons
            .par_iter_mut()
            .for_each(|neuron| neuron.settle(update_statistics));

        self.cycle += 1;
    }

    /// Zero all neuron state and all synapse delay/plasticity state.
    ///
    /// Accumulated statistics are cleared only when `reset_statistics` is
    /// set; the two reset scopes are independent.
    pub fn reset(&mut self, reset_statistics: bool) {
        for neuron in &mut self.neurons {
            neuron.reset(reset_statistics);
        }
        self.input_bank.reset_all();
        self.recurrent_bank.reset_all();
        self.output_snapshot.fill(0.0);
        self.cycle = 0;
    }

    /// Write the predictor values of all readout-eligible neurons into
    /// `buffer` starting at `offset`, in fixed stable order.
    ///
    /// Each eligible neuron contributes its primary predictor value and,
    /// when augmented predictors are enabled, its square. Returns the number
    /// of values written.
    pub fn copy_predictors_to(&self, buffer: &mut [f64], offset: usize) -> usize {
        let mut written = 0;
        for &index in &self.predictor_indices {
            let value = self.neurons[index].predictor_value();
            buffer[offset + written] = value;
            written += 1;
            if self.augmented_predictors {
                buffer[offset + written] = value * value;
                written += 1;
            }
        }
        written
    }

    /// Aggregate health metrics over the current statistics window.
    pub fn collect_statistics(&self) -> ReservoirStatistics {
        ReservoirStatistics::collect(self)
    }
}

/// Resolve the signal a synapse reads this cycle: the current input value
/// for input-field sources, the snapshotted previous-cycle output for
/// neuron sources.
#[inline]
fn source_signal(source: SynapseSource, input: &[f64], snapshot: &[f64]) -> f64 {
    match source {
        SynapseSource::Input(id) => input[id.index()],
        SynapseSource::Neuron(id) => snapshot[id.index()],
    }
}
