// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Synapse Variants and Banks
//!
//! A synapse is a directed, weighted, delayed edge from a signal source (an
//! input field or another neuron) to a target neuron. Like neurons, synapses
//! are a closed tagged-variant type: the static variant passes signals at
//! fixed efficacy 1, the dynamic variant modulates its efficacy per
//! activation with Tsodyks–Markram short-term facilitation/depression.
//!
//! ## Delay contract
//!
//! A signal entering a synapse with delay `d` at cycle `t` reaches the
//! target at cycle `t + d`; `d = 0` passes through in the same cycle.
//!
//! Synapses are grouped into [`SynapseBank`]s indexed by target neuron. A
//! bank holds at most one synapse per ordered (source, target) pair;
//! duplicate insertions are rejected, never merged.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::types::{InputId, NeuralError, NeuronId, Result};

/// Where a synapse draws its signal from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynapseSource {
    /// An external input field (index into the per-cycle input vector).
    Input(InputId),
    /// Another neuron of the reservoir.
    Neuron(NeuronId),
}

impl SynapseSource {
    /// Collision-free key for duplicate detection within a bank slot.
    #[inline]
    fn key(self) -> u64 {
        match self {
            SynapseSource::Input(id) => (1u64 << 32) | id.0 as u64,
            SynapseSource::Neuron(id) => id.0 as u64,
        }
    }
}

/// Short-term-plasticity parameters of a dynamic synapse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlasticitySettings {
    /// Baseline release fraction `U`, in (0, 1].
    pub resting_efficacy: f64,
    /// Facilitation recovery time constant, in cycles.
    pub facilitation_tau: f64,
    /// Depression recovery time constant, in cycles.
    pub depression_tau: f64,
}

impl PlasticitySettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.resting_efficacy) || self.resting_efficacy == 0.0 {
            return Err(NeuralError::RestingEfficacyOutOfRange(self.resting_efficacy));
        }
        if self.facilitation_tau <= 0.0 {
            return Err(NeuralError::NonPositiveTimeConstant(self.facilitation_tau));
        }
        if self.depression_tau <= 0.0 {
            return Err(NeuralError::NonPositiveTimeConstant(self.depression_tau));
        }
        Ok(())
    }
}

/// Running facilitation/depression state of a dynamic synapse.
///
/// `u` (release fraction) and `r` (available resources) are the values at the
/// most recent presynaptic activation; between activations they relax toward
/// `U` and 1 with time constants `τ_f` and `τ_d`.
#[derive(Debug, Clone, Copy)]
pub struct PlasticityState {
    settings: PlasticitySettings,
    u: f64,
    r: f64,
    cycles_since_activation: Option<u32>,
}

impl PlasticityState {
    pub fn new(settings: PlasticitySettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            u: settings.resting_efficacy,
            r: 1.0,
            cycles_since_activation: None,
        })
    }

    /// Advance one cycle; when the presynaptic side is active, update the
    /// facilitation/depression state and return the new efficacy `u × r`.
    fn observe(&mut self, activated: bool) -> f64 {
        if activated {
            if let Some(elapsed) = self.cycles_since_activation {
                let dt = elapsed as f64 + 1.0;
                let uu = self.settings.resting_efficacy;
                let decay_f = (-dt / self.settings.facilitation_tau).exp();
                let decay_d = (-dt / self.settings.depression_tau).exp();
                let released = self.u * self.r;
                self.u = uu + self.u * (1.0 - uu) * decay_f;
                self.r = 1.0 + (self.r - released - 1.0) * decay_d;
            }
            self.cycles_since_activation = Some(0);
        } else if let Some(elapsed) = self.cycles_since_activation.as_mut() {
            *elapsed = elapsed.saturating_add(1);
        }
        self.u * self.r
    }

    /// Current efficacy without advancing the state.
    #[inline]
    pub fn efficacy(&self) -> f64 {
        self.u * self.r
    }

    pub fn reset(&mut self) {
        self.u = self.settings.resting_efficacy;
        self.r = 1.0;
        self.cycles_since_activation = None;
    }
}

/// Static (fixed-efficacy) vs dynamic (short-term-plastic) synapse.
#[derive(Debug, Clone)]
pub enum SynapseKind {
    Static,
    Dynamic(PlasticityState),
}

/// Conduction-delay ring buffer.
///
/// Length equals the delay; a zero-delay line passes signals straight
/// through without buffering.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    cursor: usize,
}

impl DelayLine {
    pub fn new(delay: u16) -> Self {
        Self { buffer: vec![0.0; delay as usize], cursor: 0 }
    }

    /// Push this cycle's signal and pop the one due now.
    #[inline]
    pub fn shift(&mut self, incoming: f64) -> f64 {
        if self.buffer.is_empty() {
            return incoming;
        }
        let due = self.buffer[self.cursor];
        self.buffer[self.cursor] = incoming;
        self.cursor = (self.cursor + 1) % self.buffer.len();
        due
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
    }
}

/// A directed, weighted, delayed edge between two signal-bearing nodes.
#[derive(Debug, Clone)]
pub struct Synapse {
    source: SynapseSource,
    target: NeuronId,
    weight: f64,
    delay: u16,
    line: DelayLine,
    kind: SynapseKind,
}

impl Synapse {
    /// A static synapse with zero delay (delays are assigned bank-wide after
    /// generation).
    pub fn fixed(source: SynapseSource, target: NeuronId, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
            delay: 0,
            line: DelayLine::new(0),
            kind: SynapseKind::Static,
        }
    }

    /// A dynamic synapse whose efficacy follows the given plasticity settings.
    pub fn plastic(
        source: SynapseSource,
        target: NeuronId,
        weight: f64,
        settings: PlasticitySettings,
    ) -> Result<Self> {
        Ok(Self {
            source,
            target,
            weight,
            delay: 0,
            line: DelayLine::new(0),
            kind: SynapseKind::Dynamic(PlasticityState::new(settings)?),
        })
    }

    #[inline]
    pub fn source(&self) -> SynapseSource {
        self.source
    }

    #[inline]
    pub fn target(&self) -> NeuronId {
        self.target
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn delay(&self) -> u16 {
        self.delay
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, SynapseKind::Dynamic(_))
    }

    /// Current short-term efficacy (1.0 for static synapses).
    pub fn efficacy(&self) -> f64 {
        match &self.kind {
            SynapseKind::Static => 1.0,
            SynapseKind::Dynamic(state) => state.efficacy(),
        }
    }

    /// Replace the conduction delay, discarding any buffered signal.
    pub fn set_delay(&mut self, delay: u16) {
        self.delay = delay;
        self.line = DelayLine::new(delay);
    }

    /// Rescale the weight (spectral-radius normalization).
    pub fn scale_weight(&mut self, factor: f64) {
        self.weight *= factor;
    }

    /// Feed the presynaptic signal in and take the delayed signal out.
    ///
    /// Advances the delay line and, for dynamic synapses, the plasticity
    /// state. Called exactly once per synapse per cycle.
    pub fn propagate(&mut self, source_signal: f64) -> f64 {
        let efficacy = match &mut self.kind {
            SynapseKind::Static => 1.0,
            SynapseKind::Dynamic(state) => state.observe(source_signal != 0.0),
        };
        self.line.shift(self.weight * efficacy * source_signal)
    }

    /// Clear delay-buffer and plasticity state.
    pub fn reset(&mut self) {
        self.line.clear();
        if let SynapseKind::Dynamic(state) = &mut self.kind {
            state.reset();
        }
    }
}

/// A per-target collection of synapses with duplicate-edge rejection.
///
/// Slot `i` holds the inbound synapses of target neuron `i`; iteration order
/// within a slot is insertion order, so per-target summation is stable and
/// the simulation is independent of worker partitioning.
#[derive(Debug, Clone)]
pub struct SynapseBank {
    slots: Vec<Vec<Synapse>>,
    seen: Vec<AHashSet<u64>>,
    len: usize,
}

impl SynapseBank {
    pub fn new(num_targets: usize) -> Self {
        Self {
            slots: vec![Vec::new(); num_targets],
            seen: vec![AHashSet::new(); num_targets],
            len: 0,
        }
    }

    #[inline]
    pub fn num_targets(&self) -> usize {
        self.slots.len()
    }

    /// Total number of synapses across all targets.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a synapse unless its (source, target) pair already exists.
    ///
    /// Returns `false` on a duplicate; the existing synapse is untouched.
    /// Duplicate collisions are the expected reconciliation mechanism during
    /// generation, not errors.
    pub fn try_insert(&mut self, synapse: Synapse) -> bool {
        let slot = synapse.target().index();
        if !self.seen[slot].insert(synapse.source().key()) {
            return false;
        }
        self.slots[slot].push(synapse);
        self.len += 1;
        true
    }

    /// Whether the ordered (source, target) pair exists in the bank.
    pub fn contains(&self, source: SynapseSource, target: NeuronId) -> bool {
        self.seen[target.index()].contains(&source.key())
    }

    /// Inbound synapses of one target neuron.
    #[inline]
    pub fn inbound(&self, target: NeuronId) -> &[Synapse] {
        &self.slots[target.index()]
    }

    /// Mutable view of all slots, indexed by target (for the parallel phase).
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [Vec<Synapse>] {
        &mut self.slots
    }

    /// All synapses, targets ascending, insertion order within a target.
    pub fn iter(&self) -> impl Iterator<Item = &Synapse> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Synapse> {
        self.slots.iter_mut().flatten()
    }

    /// Reset every synapse's delay-buffer and plasticity state.
    pub fn reset_all(&mut self) {
        for synapse in self.iter_mut() {
            synapse.reset();
        }
    }
}
