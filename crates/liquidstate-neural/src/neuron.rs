// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Variants
//!
//! Closed tagged-variant neuron model: analog leaky integrators and spiking
//! LIF units share one struct and dispatch on the stored [`NeuronModel`] tag.
//!
//! ## Model Dynamics
//!
//! ```text
//! Analog:
//!     s(t+1) = retainment × s(t) + (1 − retainment) × f(I_ext + I_rec + bias)
//!     output = s(t+1)
//!
//! Spiking (LIF):
//!     V(t+1) = V(t) + I_syn − g_leak × (V(t) − V_rest)
//!     fire when V(t+1) ≥ threshold outside the refractory window;
//!     on fire: V ← V_rest, countdown ← refractory_period, output = 1.0
//! ```
//!
//! Every cycle is split into two strictly ordered steps: `stimulate` stores
//! the accumulated synaptic input, `settle` folds it into the new state.
//! A neuron never observes another neuron's same-cycle state.

use serde::{Deserialize, Serialize};

use crate::stats::NeuronStats;
use crate::types::{NeuralError, NeuronId, PoolId, Position, Result};

/// Retainment rates at or above this value make the leaky integrator
/// divergent; construction clamps below it.
pub const MAX_RETAINMENT: f64 = 0.99;

/// Per-cycle decay of the spiking firing trace exposed as predictor value.
const FIRING_TRACE_DECAY: f64 = 0.75;

/// Excitatory/inhibitory role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronRole {
    Excitatory,
    Inhibitory,
}

impl NeuronRole {
    /// Sign applied to every outgoing synaptic weight: +1 or −1.
    #[inline]
    pub fn signum(self) -> f64 {
        match self {
            NeuronRole::Excitatory => 1.0,
            NeuronRole::Inhibitory => -1.0,
        }
    }
}

/// Signal semantics of a neuron: continuous state vs binary firing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationKind {
    Analog,
    Spiking,
}

/// Activation functions available to analog neurons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalogActivation {
    Tanh,
    Sigmoid,
    Identity,
}

impl AnalogActivation {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            AnalogActivation::Tanh => x.tanh(),
            AnalogActivation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            AnalogActivation::Identity => x,
        }
    }
}

/// Tagged neuron model parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum NeuronModel {
    Analog {
        activation: AnalogActivation,
        /// Fraction of the previous state retained per cycle, `< MAX_RETAINMENT`.
        retainment: f64,
    },
    Spiking {
        threshold: f64,
        resting_potential: f64,
        leak_coefficient: f64,
        refractory_period: u16,
    },
}

impl NeuronModel {
    #[inline]
    pub fn kind(&self) -> ActivationKind {
        match self {
            NeuronModel::Analog { .. } => ActivationKind::Analog,
            NeuronModel::Spiking { .. } => ActivationKind::Spiking,
        }
    }

    fn initial_state(&self) -> f64 {
        match self {
            NeuronModel::Analog { .. } => 0.0,
            NeuronModel::Spiking { resting_potential, .. } => *resting_potential,
        }
    }
}

/// Immutable placement of a neuron within the reservoir.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub pool: PoolId,
    pub index_in_pool: u32,
    pub reservoir_index: NeuronId,
    pub position: Position,
}

/// A single stateful unit of the reservoir.
///
/// Owned exclusively by the reservoir's flat neuron array; synapses refer to
/// neurons by index, never by ownership.
#[derive(Debug, Clone)]
pub struct Neuron {
    role: NeuronRole,
    model: NeuronModel,
    placement: Placement,
    bias: f64,
    predictor: bool,

    // Mutable simulation state
    state: f64,
    previous_state: f64,
    output: f64,
    external_stimulation: f64,
    recurrent_stimulation: f64,
    refractory_countdown: u16,
    fired: bool,
    firing_trace: f64,

    /// Activity statistics, updated by `settle` when requested.
    pub stats: NeuronStats,
}

impl Neuron {
    pub fn new(
        role: NeuronRole,
        model: NeuronModel,
        placement: Placement,
        bias: f64,
        predictor: bool,
    ) -> Result<Self> {
        if let NeuronModel::Analog { retainment, .. } = model {
            if !(0.0..MAX_RETAINMENT).contains(&retainment) {
                return Err(NeuralError::RetainmentOutOfRange(retainment));
            }
        }
        let state = model.initial_state();
        Ok(Self {
            role,
            model,
            placement,
            bias,
            predictor,
            state,
            previous_state: state,
            output: 0.0,
            external_stimulation: 0.0,
            recurrent_stimulation: 0.0,
            refractory_countdown: 0,
            fired: false,
            firing_trace: 0.0,
            stats: NeuronStats::default(),
        })
    }

    #[inline]
    pub fn role(&self) -> NeuronRole {
        self.role
    }

    #[inline]
    pub fn kind(&self) -> ActivationKind {
        self.model.kind()
    }

    #[inline]
    pub fn model(&self) -> &NeuronModel {
        &self.model
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Whether this neuron feeds the external readout layer.
    #[inline]
    pub fn is_predictor(&self) -> bool {
        self.predictor
    }

    /// Signal seen by outgoing synapses: the analog state, or 1.0/0.0 for a
    /// spiking neuron depending on whether it fired last cycle.
    #[inline]
    pub fn output_signal(&self) -> f64 {
        self.output
    }

    /// Whether the neuron fired on the most recent cycle (spiking only).
    #[inline]
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Store the accumulated synaptic input for this cycle.
    ///
    /// First step of the two-phase cycle; the value is folded into the state
    /// by the subsequent `settle` call.
    #[inline]
    pub fn stimulate(&mut self, external: f64, recurrent: f64) {
        self.external_stimulation = external;
        self.recurrent_stimulation = recurrent;
    }

    /// Fold the stored stimulation and bias into the new state and output.
    pub fn settle(&mut self, update_statistics: bool) {
        let stimulation = self.external_stimulation + self.recurrent_stimulation + self.bias;
        self.previous_state = self.state;

        match self.model {
            NeuronModel::Analog { activation, retainment } => {
                self.state = retainment * self.previous_state
                    + (1.0 - retainment) * activation.apply(stimulation);
                self.output = self.state;
                self.fired = false;
            }
            NeuronModel::Spiking {
                threshold,
                resting_potential,
                leak_coefficient,
                refractory_period,
            } => {
                if self.refractory_countdown > 0 {
                    // Blocked for the whole cycle; incoming stimulation is lost.
                    self.refractory_countdown -= 1;
                    self.fired = false;
                    self.output = 0.0;
                } else {
                    let potential = self.previous_state + stimulation
                        - leak_coefficient * (self.previous_state - resting_potential);
                    if potential >= threshold {
                        self.fired = true;
                        self.state = resting_potential;
                        self.refractory_countdown = refractory_period;
                        self.output = 1.0;
                    } else {
                        self.fired = false;
                        self.state = potential;
                        self.output = 0.0;
                    }
                }
                self.firing_trace =
                    self.firing_trace * FIRING_TRACE_DECAY + if self.fired { 1.0 } else { 0.0 };
            }
        }

        if update_statistics {
            self.stats.record(self.output, self.fired);
        }

        self.external_stimulation = 0.0;
        self.recurrent_stimulation = 0.0;
    }

    /// The scalar exposed to the readout layer: the analog state, or the
    /// decaying firing trace for spiking neurons.
    #[inline]
    pub fn predictor_value(&self) -> f64 {
        match self.model {
            NeuronModel::Analog { .. } => self.state,
            NeuronModel::Spiking { .. } => self.firing_trace,
        }
    }

    /// Zero all simulation state; statistics are cleared only when asked.
    ///
    /// The two reset scopes (structural state vs accumulated statistics) are
    /// independent and must never be conflated.
    pub fn reset(&mut self, reset_statistics: bool) {
        let state = self.model.initial_state();
        self.state = state;
        self.previous_state = state;
        self.output = 0.0;
        self.external_stimulation = 0.0;
        self.recurrent_stimulation = 0.0;
        self.refractory_countdown = 0;
        self.fired = false;
        self.firing_trace = 0.0;
        if reset_statistics {
            self.stats.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            pool: PoolId(0),
            index_in_pool: 0,
            reservoir_index: NeuronId(0),
            position: (0, 0, 0),
        }
    }

    fn analog(retainment: f64) -> Neuron {
        Neuron::new(
            NeuronRole::Excitatory,
            NeuronModel::Analog { activation: AnalogActivation::Tanh, retainment },
            placement(),
            0.0,
            true,
        )
        .unwrap()
    }

    fn spiking(threshold: f64, refractory: u16) -> Neuron {
        Neuron::new(
            NeuronRole::Excitatory,
            NeuronModel::Spiking {
                threshold,
                resting_potential: 0.0,
                leak_coefficient: 0.0,
                refractory_period: refractory,
            },
            placement(),
            0.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn retainment_at_or_above_limit_is_rejected() {
        let result = Neuron::new(
            NeuronRole::Excitatory,
            NeuronModel::Analog { activation: AnalogActivation::Tanh, retainment: 1.0 },
            placement(),
            0.0,
            false,
        );
        assert!(result.is_err());
        assert!(Neuron::new(
            NeuronRole::Excitatory,
            NeuronModel::Analog { activation: AnalogActivation::Tanh, retainment: MAX_RETAINMENT },
            placement(),
            0.0,
            false,
        )
        .is_err());
    }

    #[test]
    fn analog_neuron_leaks_toward_activation() {
        let mut n = analog(0.5);
        n.stimulate(100.0, 0.0); // tanh saturates to ~1.0
        n.settle(false);
        assert!((n.output_signal() - 0.5).abs() < 1e-9);
        n.stimulate(100.0, 0.0);
        n.settle(false);
        assert!((n.output_signal() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn spiking_neuron_fires_and_enters_refractory() {
        let mut n = spiking(1.0, 2);
        n.stimulate(1.5, 0.0);
        n.settle(true);
        assert!(n.fired());
        assert_eq!(n.output_signal(), 1.0);

        // Two refractory cycles: stimulation is discarded.
        for _ in 0..2 {
            n.stimulate(10.0, 0.0);
            n.settle(true);
            assert!(!n.fired());
            assert_eq!(n.output_signal(), 0.0);
        }

        // Out of refractory: fires again.
        n.stimulate(1.5, 0.0);
        n.settle(true);
        assert!(n.fired());
        assert_eq!(n.stats.fires, 2);
    }

    #[test]
    fn subthreshold_potential_accumulates() {
        let mut n = spiking(1.0, 0);
        n.stimulate(0.6, 0.0);
        n.settle(false);
        assert!(!n.fired());
        n.stimulate(0.6, 0.0);
        n.settle(false);
        assert!(n.fired(), "0.6 + 0.6 crosses the 1.0 threshold");
    }

    #[test]
    fn reset_restores_fresh_predictor_values() {
        let mut n = analog(0.3);
        n.stimulate(2.0, 1.0);
        n.settle(true);
        assert!(n.predictor_value() != 0.0);

        n.reset(false);
        assert_eq!(n.predictor_value(), 0.0);
        assert_eq!(n.output_signal(), 0.0);
        assert_eq!(n.stats.cycles, 1, "structural reset must keep statistics");

        n.reset(true);
        assert_eq!(n.stats.cycles, 0);
    }
}
