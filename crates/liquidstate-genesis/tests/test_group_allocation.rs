// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for pool partitioning.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use liquidstate_genesis::topology::grow;
use liquidstate_genesis::{
    DelaySettings, GroupModelSettings, NeuronGroupSettings, PoolSettings, ReservoirSettings,
    ValueDist,
};
use liquidstate_neural::neuron::{AnalogActivation, NeuronRole};
use liquidstate_neural::types::PoolDimensions;

fn group(role: NeuronRole, share: f64) -> NeuronGroupSettings {
    NeuronGroupSettings {
        name: format!("{:?}", role),
        role,
        relative_share: share,
        model: GroupModelSettings::Analog {
            activation: AnalogActivation::Tanh,
            retainment: None,
        },
        bias: ValueDist::Constant(0.0),
        predictor_ratio: 0.0,
    }
}

fn settings(dims: PoolDimensions, shares: (f64, f64)) -> ReservoirSettings {
    ReservoirSettings {
        input_count: 0,
        pools: vec![PoolSettings {
            name: "pool".into(),
            dimensions: dims,
            groups: vec![
                group(NeuronRole::Excitatory, shares.0),
                group(NeuronRole::Inhibitory, shares.1),
            ],
        }],
        input_connections: Vec::new(),
        interconnections: Vec::new(),
        input_delays: DelaySettings::default(),
        recurrent_delays: DelaySettings::default(),
        spectral_radius: None,
        augmented_predictors: false,
    }
}

proptest! {
    /// The partition always sums to the pool size exactly, and each group's
    /// count stays within one neuron of its exact share.
    #[test]
    fn group_counts_partition_the_pool(
        share_e in 0.05f64..10.0,
        share_i in 0.05f64..10.0,
        width in 1u32..8,
        height in 1u32..8,
        depth in 1u32..4,
        seed in 0u64..1000,
    ) {
        let dims = PoolDimensions::new(width, height, depth);
        let total = dims.total();
        let mut rng = StdRng::seed_from_u64(seed);
        let topology = grow(&settings(dims, (share_e, share_i)), &mut rng).unwrap();

        prop_assert_eq!(topology.neurons.len(), total);

        let excitatory = topology
            .neurons
            .iter()
            .filter(|n| n.role() == NeuronRole::Excitatory)
            .count();
        let exact = share_e / (share_e + share_i) * total as f64;
        prop_assert!(
            (excitatory as f64 - exact).abs() <= 1.0,
            "excitatory count {} drifted from exact share {}",
            excitatory,
            exact
        );
    }
}
