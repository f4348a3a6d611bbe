// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end reservoir lifecycle tests: develop, compute, reset.

use liquidstate::genesis::{
    develop, DelayMethod, DelaySettings, GroupModelSettings, InputConnectionSettings,
    InterconnectSettings, NeuronGroupSettings, PoolSettings, ReservoirSettings, SpectralTargets,
    TargetScope, ValueDist,
};
use liquidstate::neural::neuron::{AnalogActivation, NeuronRole};
use liquidstate::neural::types::{InputId, NeuronId, PoolDimensions};
use liquidstate::Reservoir;

fn settings() -> ReservoirSettings {
    ReservoirSettings {
        input_count: 1,
        pools: vec![PoolSettings {
            name: "main".into(),
            dimensions: PoolDimensions::new(5, 5, 2),
            groups: vec![
                NeuronGroupSettings {
                    name: "exc".into(),
                    role: NeuronRole::Excitatory,
                    relative_share: 0.8,
                    model: GroupModelSettings::Analog {
                        activation: AnalogActivation::Tanh,
                        retainment: None,
                    },
                    bias: ValueDist::Uniform { low: -0.05, high: 0.05 },
                    predictor_ratio: 1.0,
                },
                NeuronGroupSettings {
                    name: "inh".into(),
                    role: NeuronRole::Inhibitory,
                    relative_share: 0.2,
                    model: GroupModelSettings::Analog {
                        activation: AnalogActivation::Tanh,
                        retainment: None,
                    },
                    bias: ValueDist::Constant(0.0),
                    predictor_ratio: 0.0,
                },
            ],
        }],
        input_connections: vec![InputConnectionSettings {
            input: InputId(0),
            pool: "main".into(),
            density: 0.6,
            scope: TargetScope::any(),
            weight: ValueDist::Uniform { low: -0.5, high: 0.5 },
        }],
        interconnections: vec![InterconnectSettings {
            source_pool: "main".into(),
            target_pool: "main".into(),
            density: 0.08,
            ratio_ee: 0.5,
            ratio_ei: 0.2,
            ratio_ie: 0.2,
            ratio_ii: 0.1,
            avg_distance: None,
            allow_self_connection: false,
            max_sources: None,
            max_targets_per_source: 10,
            weight: ValueDist::Uniform { low: 0.0, high: 0.6 },
            plasticity: None,
        }],
        input_delays: DelaySettings { method: DelayMethod::Random, max_delay: 1 },
        recurrent_delays: DelaySettings { method: DelayMethod::Distance, max_delay: 3 },
        spectral_radius: Some(SpectralTargets::unified(0.85)),
        augmented_predictors: true,
    }
}

fn trajectory(reservoir: &mut Reservoir, cycles: usize) -> Vec<Vec<f64>> {
    let width = reservoir.predictor_count();
    (0..cycles)
        .map(|i| {
            let mut row = vec![0.0; width];
            reservoir.compute(&[(i as f64 * 0.37).sin()], true);
            let written = reservoir.copy_predictors_to(&mut row, 0);
            assert_eq!(written, width);
            row
        })
        .collect()
}

#[test]
fn identical_seeds_reproduce_identical_topology_and_trajectory() {
    let s = settings();
    let mut a = develop(&s, 9000).unwrap();
    let mut b = develop(&s, 9000).unwrap();

    // Bit-identical topology: same synapse source/target/weight/delay sets.
    assert_eq!(a.recurrent_bank().len(), b.recurrent_bank().len());
    for index in 0..a.neurons().len() {
        let id = NeuronId(index as u32);
        let lhs = a.recurrent_bank().inbound(id);
        let rhs = b.recurrent_bank().inbound(id);
        assert_eq!(lhs.len(), rhs.len());
        for (x, y) in lhs.iter().zip(rhs) {
            assert_eq!(x.source(), y.source());
            assert_eq!(x.weight(), y.weight());
            assert_eq!(x.delay(), y.delay());
        }
    }

    // Bit-identical trajectories for identical inputs.
    assert_eq!(trajectory(&mut a, 60), trajectory(&mut b, 60));
}

#[test]
fn different_seeds_differ() {
    let s = settings();
    let mut a = develop(&s, 1).unwrap();
    let mut b = develop(&s, 2).unwrap();
    assert_ne!(trajectory(&mut a, 10), trajectory(&mut b, 10));
}

#[test]
fn reset_is_idempotent_with_fresh_construction() {
    let s = settings();
    let mut reservoir = develop(&s, 77).unwrap();

    let width = reservoir.predictor_count();
    let mut fresh = vec![0.0; width];
    reservoir.copy_predictors_to(&mut fresh, 0);

    let first = trajectory(&mut reservoir, 40);
    reservoir.reset(true);

    let mut after_reset = vec![0.0; width];
    reservoir.copy_predictors_to(&mut after_reset, 0);
    assert_eq!(after_reset, fresh);

    // The full trajectory replays identically after a reset.
    assert_eq!(trajectory(&mut reservoir, 40), first);
}

#[test]
fn spectral_radius_matches_the_configured_target() {
    use liquidstate::genesis::spectral::{estimate_radius, SpectralScope};

    let s = settings();
    let reservoir = develop(&s, 123).unwrap();

    let radius =
        estimate_radius(reservoir.recurrent_bank(), reservoir.neurons(), SpectralScope::All)
            .unwrap();
    assert!(
        (radius - 0.85).abs() / 0.85 < 1e-3,
        "spectral radius {} missed the 0.85 target",
        radius
    );
}

#[test]
fn statistics_report_matches_the_structure() {
    let s = settings();
    let mut reservoir = develop(&s, 55).unwrap();
    for i in 0..30 {
        reservoir.compute(&[(i as f64 * 0.2).cos()], true);
    }

    let stats = reservoir.collect_statistics();
    assert_eq!(stats.neuron_count, 50);
    assert_eq!(stats.pool_count, 1);
    assert_eq!(stats.input_synapse_count, reservoir.input_bank().len());
    assert_eq!(stats.recurrent_synapse_count, reservoir.recurrent_bank().len());
    assert_eq!(stats.cycles, 30);
    assert_eq!(
        stats.weights.count as usize,
        reservoir.input_bank().len() + reservoir.recurrent_bank().len()
    );
    // Driven tanh network: nothing should rail permanently at +-1.
    assert!(stats.saturated_fraction < 0.5);
}

#[test]
fn predictor_vector_width_counts_augmented_values() {
    let s = settings();
    let reservoir = develop(&s, 8).unwrap();
    // 40 excitatory neurons are all predictor-eligible, each contributing
    // its value and its square.
    assert_eq!(reservoir.predictor_count(), 80);
}
