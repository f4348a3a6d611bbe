// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology growth: one neuron per pool grid cell.
//!
//! Neuron counts per group are allocated by rounding the normalized group
//! shares, then drift-corrected so the sum matches the pool size exactly.
//! Parameter records are shuffled before grid placement so spatial position
//! is independent of generation order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use liquidstate_engine::PoolRange;
use liquidstate_neural::neuron::{Neuron, NeuronModel, NeuronRole, Placement, MAX_RETAINMENT};
use liquidstate_neural::types::{NeuronId, PoolId};

use crate::error::{GenesisError, GenesisResult};
use crate::settings::{GroupModelSettings, NeuronGroupSettings, PoolSettings, ReservoirSettings};

/// Output of topology growth: the flat neuron array plus the pool
/// partition view over it.
#[derive(Debug)]
pub struct Topology {
    pub neurons: Vec<Neuron>,
    pub pools: Vec<PoolRange>,
}

impl Topology {
    /// Index range of the pool with the given name.
    pub fn pool_named(&self, name: &str) -> Option<&PoolRange> {
        self.pools.iter().find(|p| p.name == name)
    }
}

/// Per-neuron parameters resolved from a group, before placement.
struct Blueprint {
    role: NeuronRole,
    model: NeuronModel,
    bias: f64,
    predictor: bool,
}

/// Instantiate every pool's neurons on its coordinate grid.
pub fn grow(settings: &ReservoirSettings, rng: &mut StdRng) -> GenesisResult<Topology> {
    let mut neurons = Vec::new();
    let mut pools = Vec::with_capacity(settings.pools.len());

    for (pool_index, pool) in settings.pools.iter().enumerate() {
        let size = pool.dimensions.total();
        if size == 0 {
            return Err(GenesisError::EmptyPool(pool.name.clone()));
        }

        let counts = allocate_group_counts(pool, size)?;
        let mut blueprints = Vec::with_capacity(size);
        for (group, &count) in pool.groups.iter().zip(&counts) {
            blueprints.extend(resolve_group(group, count, rng));
        }

        // Decouple parameters from grid order.
        blueprints.shuffle(rng);

        let base = neurons.len();
        for (cell, blueprint) in blueprints.into_iter().enumerate() {
            let placement = Placement {
                pool: PoolId(pool_index as u32),
                index_in_pool: cell as u32,
                reservoir_index: NeuronId((base + cell) as u32),
                position: pool.dimensions.position_of(cell),
            };
            neurons.push(Neuron::new(
                blueprint.role,
                blueprint.model,
                placement,
                blueprint.bias,
                blueprint.predictor,
            )?);
        }

        debug!(
            target: "liquid-genesis",
            pool = %pool.name,
            size,
            groups = pool.groups.len(),
            "pool grown"
        );
        pools.push(PoolRange {
            id: PoolId(pool_index as u32),
            name: pool.name.clone(),
            dimensions: pool.dimensions,
            range: base..base + size,
        });
    }

    info!(
        target: "liquid-genesis",
        neurons = neurons.len(),
        pools = pools.len(),
        "topology grown"
    );
    Ok(Topology { neurons, pools })
}

/// Allocate per-group neuron counts: round each normalized share, then
/// correct rounding drift one neuron at a time (shrink the largest group /
/// grow the smallest) until the counts sum to the pool size exactly.
fn allocate_group_counts(pool: &PoolSettings, size: usize) -> GenesisResult<Vec<usize>> {
    let total_share: f64 = pool.groups.iter().map(|g| g.relative_share).sum();
    if total_share <= 0.0 || pool.groups.is_empty() {
        return Err(GenesisError::ZeroGroupShare(pool.name.clone()));
    }

    let mut counts: Vec<usize> = pool
        .groups
        .iter()
        .map(|g| (g.relative_share / total_share * size as f64).round() as usize)
        .collect();

    loop {
        let sum: usize = counts.iter().sum();
        if sum == size {
            break;
        }
        if sum > size {
            let largest = counts
                .iter()
                .enumerate()
                .max_by_key(|(_, &c)| c)
                .map(|(i, _)| i)
                .expect("pool has at least one group");
            counts[largest] -= 1;
        } else {
            let smallest = counts
                .iter()
                .enumerate()
                .min_by_key(|(_, &c)| c)
                .map(|(i, _)| i)
                .expect("pool has at least one group");
            counts[smallest] += 1;
        }
    }
    Ok(counts)
}

/// Resolve one group's blueprints: sample biases, hand a retainment rate to
/// a density-sampled subset of analog neurons, and flag a ratio-sampled
/// subset as predictors.
fn resolve_group(group: &NeuronGroupSettings, count: usize, rng: &mut StdRng) -> Vec<Blueprint> {
    let mut blueprints: Vec<Blueprint> = (0..count)
        .map(|_| Blueprint {
            role: group.role,
            model: base_model(&group.model),
            bias: group.bias.sample(rng),
            predictor: false,
        })
        .collect();

    if let GroupModelSettings::Analog { retainment: Some(retainment), .. } = &group.model {
        let retained = ((retainment.density * count as f64).round() as usize).min(count);
        for index in rand::seq::index::sample(rng, count, retained) {
            if let NeuronModel::Analog { retainment: rate, .. } = &mut blueprints[index].model {
                *rate = retainment
                    .rate
                    .sample(rng)
                    .clamp(0.0, MAX_RETAINMENT - 1e-9);
            }
        }
    }

    let predictors = ((group.predictor_ratio * count as f64).round() as usize).min(count);
    for index in rand::seq::index::sample(rng, count, predictors) {
        blueprints[index].predictor = true;
    }

    blueprints
}

fn base_model(settings: &GroupModelSettings) -> NeuronModel {
    match *settings {
        GroupModelSettings::Analog { activation, .. } => {
            NeuronModel::Analog { activation, retainment: 0.0 }
        }
        GroupModelSettings::Spiking {
            threshold,
            resting_potential,
            leak_coefficient,
            refractory_period,
        } => NeuronModel::Spiking {
            threshold,
            resting_potential,
            leak_coefficient,
            refractory_period,
        },
    }
}
