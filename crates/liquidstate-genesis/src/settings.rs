// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resolved construction settings.
//!
//! These are immutable value objects handed over by an external
//! configuration layer; parsing and validation of raw config formats is not
//! this crate's concern. Everything here is plain data plus small sampling
//! helpers.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use liquidstate_neural::neuron::{ActivationKind, AnalogActivation, NeuronRole};
use liquidstate_neural::synapse::PlasticitySettings;
use liquidstate_neural::types::{InputId, PoolDimensions};

/// A scalar sampling distribution for weights, biases, and rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueDist {
    Constant(f64),
    Uniform { low: f64, high: f64 },
    Gaussian { mean: f64, stdev: f64 },
}

impl ValueDist {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            ValueDist::Constant(value) => value,
            ValueDist::Uniform { low, high } => low + rng.gen::<f64>() * (high - low),
            ValueDist::Gaussian { mean, stdev } => {
                Normal::new(mean, stdev).map_or(mean, |dist| dist.sample(rng))
            }
        }
    }
}

/// Role restriction on connection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleScope {
    Any,
    ExcitatoryOnly,
    InhibitoryOnly,
}

impl RoleScope {
    #[inline]
    pub fn admits(self, role: NeuronRole) -> bool {
        match self {
            RoleScope::Any => true,
            RoleScope::ExcitatoryOnly => role == NeuronRole::Excitatory,
            RoleScope::InhibitoryOnly => role == NeuronRole::Inhibitory,
        }
    }
}

/// Target restriction of an input connection, applied independently to
/// analog and spiking targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetScope {
    pub analog: RoleScope,
    pub spiking: RoleScope,
}

impl TargetScope {
    pub fn any() -> Self {
        Self { analog: RoleScope::Any, spiking: RoleScope::Any }
    }

    #[inline]
    pub fn admits(&self, kind: ActivationKind, role: NeuronRole) -> bool {
        match kind {
            ActivationKind::Analog => self.analog.admits(role),
            ActivationKind::Spiking => self.spiking.admits(role),
        }
    }
}

/// Leak configuration of an analog neuron group: a sampled subset of the
/// group (by density) receives a nonzero retainment rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetainmentSettings {
    /// Fraction of the group's neurons receiving a retainment rate.
    pub density: f64,
    /// Distribution the rate is drawn from; samples are clamped below the
    /// divergence bound.
    pub rate: ValueDist,
}

/// Model parameters shared by every neuron of a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GroupModelSettings {
    Analog {
        activation: AnalogActivation,
        retainment: Option<RetainmentSettings>,
    },
    Spiking {
        threshold: f64,
        resting_potential: f64,
        leak_coefficient: f64,
        refractory_period: u16,
    },
}

impl GroupModelSettings {
    pub fn kind(&self) -> ActivationKind {
        match self {
            GroupModelSettings::Analog { .. } => ActivationKind::Analog,
            GroupModelSettings::Spiking { .. } => ActivationKind::Spiking,
        }
    }
}

/// One neuron group within a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronGroupSettings {
    pub name: String,
    pub role: NeuronRole,
    /// Relative share of the pool's cells this group occupies; shares are
    /// normalized over the pool.
    pub relative_share: f64,
    pub model: GroupModelSettings,
    pub bias: ValueDist,
    /// Fraction of the group flagged readout-eligible.
    pub predictor_ratio: f64,
}

/// A rectangular 3D arrangement of neurons sharing generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    pub name: String,
    pub dimensions: PoolDimensions,
    pub groups: Vec<NeuronGroupSettings>,
}

/// Input field to pool assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConnectionSettings {
    pub input: InputId,
    pub pool: String,
    /// Fraction of the pool's neurons receiving this input.
    pub density: f64,
    pub scope: TargetScope,
    pub weight: ValueDist,
}

/// Pool-to-pool (or pool-to-itself) connection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterconnectSettings {
    pub source_pool: String,
    pub target_pool: String,
    /// Fraction of all source x target pairs realized as synapses.
    pub density: f64,
    /// Role-mix ratios, normalized internally to sum to 1.
    pub ratio_ee: f64,
    pub ratio_ei: f64,
    pub ratio_ie: f64,
    pub ratio_ii: f64,
    /// When set, targets are drawn by Gaussian sampling around this average
    /// Euclidean distance instead of uniformly.
    pub avg_distance: Option<f64>,
    pub allow_self_connection: bool,
    /// Cap on the number of participating source neurons.
    pub max_sources: Option<usize>,
    /// Physical cap on connections planned per source.
    pub max_targets_per_source: usize,
    pub weight: ValueDist,
    /// Dynamic (short-term-plastic) synapses when set, static otherwise.
    pub plasticity: Option<PlasticitySettings>,
}

/// How conduction delays are assigned across a finished bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayMethod {
    /// Linear map of the normalized source-target distance onto
    /// `[0, max_delay]`.
    Distance,
    /// Uniform draw from `[0, max_delay]`.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaySettings {
    pub method: DelayMethod,
    pub max_delay: u16,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self { method: DelayMethod::Random, max_delay: 0 }
    }
}

/// Target dominant-eigenvalue magnitudes, per activation kind.
///
/// Equal targets for both kinds collapse into a single global scaling pass
/// over the whole recurrent bank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralTargets {
    pub analog: Option<f64>,
    pub spiking: Option<f64>,
}

impl SpectralTargets {
    pub fn unified(radius: f64) -> Self {
        Self { analog: Some(radius), spiking: Some(radius) }
    }
}

/// Complete resolved construction settings for one reservoir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirSettings {
    /// Number of input fields in the per-cycle input vector.
    pub input_count: usize,
    pub pools: Vec<PoolSettings>,
    pub input_connections: Vec<InputConnectionSettings>,
    pub interconnections: Vec<InterconnectSettings>,
    pub input_delays: DelaySettings,
    pub recurrent_delays: DelaySettings,
    pub spectral_radius: Option<SpectralTargets>,
    /// Emit each predictor value together with its square.
    pub augmented_predictors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let dist = ValueDist::Uniform { low: -0.4, high: 0.4 };
        for _ in 0..1000 {
            let v = dist.sample(&mut rng);
            assert!((-0.4..0.4).contains(&v));
        }
    }

    #[test]
    fn constant_always_returns_its_value() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(ValueDist::Constant(0.25).sample(&mut rng), 0.25);
    }

    #[test]
    fn scope_admits_by_kind_and_role() {
        let scope = TargetScope {
            analog: RoleScope::ExcitatoryOnly,
            spiking: RoleScope::InhibitoryOnly,
        };
        assert!(scope.admits(ActivationKind::Analog, NeuronRole::Excitatory));
        assert!(!scope.admits(ActivationKind::Analog, NeuronRole::Inhibitory));
        assert!(!scope.admits(ActivationKind::Spiking, NeuronRole::Excitatory));
        assert!(scope.admits(ActivationKind::Spiking, NeuronRole::Inhibitory));
    }
}
