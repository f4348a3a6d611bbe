// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptogenesis: input and recurrent bank generation.
//!
//! Input banks connect declared input fields to a density-sampled,
//! scope-filtered subset of a pool. Recurrent banks realize per-role-pair
//! connection counts derived from a density budget and normalized EE/EI/IE/II
//! ratios, with per-source quotas planned to stay within one connection of
//! the pair mean. Target selection is uniform or Gaussian-distance-biased.
//!
//! Duplicate (source, target) pairs are rejected by the bank and resolved by
//! drawing another candidate; a role pair with no eligible neurons on either
//! side is skipped silently.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info, warn};

use liquidstate_neural::neuron::{Neuron, NeuronRole};
use liquidstate_neural::synapse::{Synapse, SynapseBank, SynapseSource};
use liquidstate_neural::types::spatial::euclidean;
use liquidstate_neural::types::NeuronId;

use crate::error::{GenesisError, GenesisResult};
use crate::settings::{
    DelayMethod, DelaySettings, InterconnectSettings, ReservoirSettings,
};
use crate::topology::Topology;

/// Wire every declared input field into its pool.
pub fn wire_inputs(
    topology: &Topology,
    settings: &ReservoirSettings,
    rng: &mut StdRng,
) -> GenesisResult<SynapseBank> {
    let mut bank = SynapseBank::new(topology.neurons.len());

    for conn in &settings.input_connections {
        let pool = topology
            .pool_named(&conn.pool)
            .ok_or_else(|| GenesisError::UnknownPool(conn.pool.clone()))?;
        let pool_size = pool.range.len();
        let requested = (conn.density * pool_size as f64).round() as usize;
        if requested == 0 {
            continue;
        }

        let eligible: Vec<usize> = pool
            .range
            .clone()
            .filter(|&i| {
                let neuron = &topology.neurons[i];
                conn.scope.admits(neuron.kind(), neuron.role())
            })
            .collect();
        if eligible.is_empty() {
            // An input that cannot reach its pool is a mandatory scope.
            return Err(GenesisError::EmptyInputScope {
                input: conn.input.0,
                pool: conn.pool.clone(),
                requested,
            });
        }

        let count = requested.min(eligible.len());
        for pick in rand::seq::index::sample(rng, eligible.len(), count) {
            let target = NeuronId(eligible[pick] as u32);
            let weight = conn.weight.sample(rng);
            bank.try_insert(Synapse::fixed(SynapseSource::Input(conn.input), target, weight));
        }
    }

    info!(
        target: "liquid-genesis",
        synapses = bank.len(),
        "input bank wired"
    );
    Ok(bank)
}

/// Wire every pool-to-pool interconnection rule.
pub fn wire_recurrent(
    topology: &Topology,
    settings: &ReservoirSettings,
    rng: &mut StdRng,
) -> GenesisResult<SynapseBank> {
    let mut bank = SynapseBank::new(topology.neurons.len());

    for rule in &settings.interconnections {
        let src_pool = topology
            .pool_named(&rule.source_pool)
            .ok_or_else(|| GenesisError::UnknownPool(rule.source_pool.clone()))?;
        let tgt_pool = topology
            .pool_named(&rule.target_pool)
            .ok_or_else(|| GenesisError::UnknownPool(rule.target_pool.clone()))?;

        let budget =
            (rule.density * src_pool.range.len() as f64 * tgt_pool.range.len() as f64).round()
                as usize;
        if budget == 0 {
            continue;
        }

        let ratio_sum = rule.ratio_ee + rule.ratio_ei + rule.ratio_ie + rule.ratio_ii;
        if ratio_sum <= 0.0 {
            warn!(
                target: "liquid-genesis",
                source_pool = %rule.source_pool,
                target_pool = %rule.target_pool,
                "interconnection rule has zero role-mix ratios, skipped"
            );
            continue;
        }

        let pairs = [
            (NeuronRole::Excitatory, NeuronRole::Excitatory, rule.ratio_ee),
            (NeuronRole::Excitatory, NeuronRole::Inhibitory, rule.ratio_ei),
            (NeuronRole::Inhibitory, NeuronRole::Excitatory, rule.ratio_ie),
            (NeuronRole::Inhibitory, NeuronRole::Inhibitory, rule.ratio_ii),
        ];
        for (src_role, tgt_role, ratio) in pairs {
            let pair_count = (ratio / ratio_sum * budget as f64).round() as usize;
            if pair_count == 0 {
                continue;
            }

            let sources: Vec<usize> = src_pool
                .range
                .clone()
                .filter(|&i| topology.neurons[i].role() == src_role)
                .collect();
            let targets: Vec<usize> = tgt_pool
                .range
                .clone()
                .filter(|&i| topology.neurons[i].role() == tgt_role)
                .collect();
            if sources.is_empty() || targets.is_empty() {
                // Soft skip: the requested count for this role pair is
                // reduced to zero, never an error.
                debug!(
                    target: "liquid-genesis",
                    ?src_role,
                    ?tgt_role,
                    "role pair has no eligible neurons, skipped"
                );
                continue;
            }

            wire_role_pair(&mut bank, topology, rule, &sources, &targets, pair_count, rng)?;
        }
    }

    info!(
        target: "liquid-genesis",
        synapses = bank.len(),
        "recurrent bank wired"
    );
    Ok(bank)
}

/// Realize one (source role, target role) pair's connection count.
fn wire_role_pair(
    bank: &mut SynapseBank,
    topology: &Topology,
    rule: &InterconnectSettings,
    sources: &[usize],
    targets: &[usize],
    pair_count: usize,
    rng: &mut StdRng,
) -> GenesisResult<()> {
    let mut sources = sources.to_vec();
    sources.shuffle(rng);
    if let Some(cap) = rule.max_sources {
        sources.truncate(cap.max(1));
    }

    let per_source_cap = rule.max_targets_per_source.clamp(1, targets.len());
    let plan = plan_source_counts(pair_count, sources.len(), per_source_cap);

    for (&source, &quota) in sources.iter().zip(&plan) {
        if quota == 0 {
            continue;
        }
        let source_id = NeuronId(source as u32);
        let source_neuron = &topology.neurons[source];

        // Candidates: eligible targets not already connected from this
        // source (duplicate collisions resolved by redrawing).
        let mut candidates: Vec<usize> = targets
            .iter()
            .copied()
            .filter(|&t| rule.allow_self_connection || t != source)
            .filter(|&t| !bank.contains(SynapseSource::Neuron(source_id), NeuronId(t as u32)))
            .collect();

        let picks = match rule.avg_distance {
            None => {
                candidates.shuffle(rng);
                candidates.truncate(quota);
                candidates
            }
            Some(avg) => pick_by_distance(source_neuron, &candidates, topology, avg, quota, rng),
        };

        for target in picks {
            let magnitude = rule.weight.sample(rng).abs();
            let weight = magnitude * source_neuron.role().signum();
            let synapse = match rule.plasticity {
                Some(plasticity) => Synapse::plastic(
                    SynapseSource::Neuron(source_id),
                    NeuronId(target as u32),
                    weight,
                    plasticity,
                )?,
                None => Synapse::fixed(
                    SynapseSource::Neuron(source_id),
                    NeuronId(target as u32),
                    weight,
                ),
            };
            bank.try_insert(synapse);
        }
    }
    Ok(())
}

/// Plan per-source connection counts averaging `total / num_sources`, with
/// no source deviating from the mean by more than one connection, clamped to
/// the physical per-source cap.
///
/// When fewer connections than sources are requested, the leading sources
/// (already shuffled by the caller) each take a single connection.
fn plan_source_counts(total: usize, num_sources: usize, per_source_cap: usize) -> Vec<usize> {
    if num_sources == 0 {
        return Vec::new();
    }
    if total < num_sources {
        let mut plan = vec![0; num_sources];
        for slot in plan.iter_mut().take(total) {
            *slot = 1;
        }
        return plan;
    }

    let base = total / num_sources;
    let remainder = total - base * num_sources;
    let mut plan = vec![base; num_sources];
    for slot in plan.iter_mut().take(remainder) {
        *slot += 1;
    }
    for slot in plan.iter_mut() {
        *slot = (*slot).clamp(1, per_source_cap);
    }
    plan
}

/// Distance-biased small-world selection: draw a Gaussian around the
/// configured average distance and connect the unconnected candidate whose
/// Euclidean distance to the source is closest to the draw.
fn pick_by_distance(
    source: &Neuron,
    candidates: &[usize],
    topology: &Topology,
    avg_distance: f64,
    quota: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let source_pos = source.placement().position;
    let mut remaining: Vec<(usize, f64)> = candidates
        .iter()
        .map(|&t| (t, euclidean(source_pos, topology.neurons[t].placement().position)))
        .collect();

    let sigma = (avg_distance * 0.5).max(f64::EPSILON);
    let normal = Normal::new(avg_distance, sigma);

    let mut picks = Vec::with_capacity(quota);
    while picks.len() < quota && !remaining.is_empty() {
        let draw = match &normal {
            Ok(dist) => dist.sample(rng).max(0.0),
            Err(_) => avg_distance,
        };
        let (best, _) = remaining
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.1 - draw)
                    .abs()
                    .partial_cmp(&(b.1 - draw).abs())
                    .expect("distances are finite")
            })
            .expect("remaining is non-empty");
        picks.push(remaining.swap_remove(best).0);
    }
    picks
}

/// Assign conduction delays across a finished bank.
///
/// Distance mapping normalizes each synapse's source-target distance within
/// the bank's observed min-max span onto `[0, max_delay]`. Input-sourced
/// synapses carry no spatial placement and always take the uniform draw.
pub fn assign_delays(
    bank: &mut SynapseBank,
    topology: &Topology,
    settings: &DelaySettings,
    rng: &mut StdRng,
) {
    if settings.max_delay == 0 || bank.is_empty() {
        return;
    }

    match settings.method {
        DelayMethod::Random => {
            for synapse in bank.iter_mut() {
                synapse.set_delay(rng.gen_range(0..=settings.max_delay));
            }
        }
        DelayMethod::Distance => {
            let distances: Vec<Option<f64>> = bank
                .iter()
                .map(|syn| match syn.source() {
                    SynapseSource::Neuron(src) => Some(euclidean(
                        topology.neurons[src.index()].placement().position,
                        topology.neurons[syn.target().index()].placement().position,
                    )),
                    SynapseSource::Input(_) => None,
                })
                .collect();

            let span: Option<(f64, f64)> = distances
                .iter()
                .flatten()
                .fold(None, |acc, &d| match acc {
                    None => Some((d, d)),
                    Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
                });

            for (synapse, distance) in bank.iter_mut().zip(distances) {
                match (distance, span) {
                    (Some(d), Some((lo, hi))) => {
                        let normalized = if hi - lo < f64::EPSILON {
                            0.0
                        } else {
                            (d - lo) / (hi - lo)
                        };
                        synapse
                            .set_delay((normalized * settings.max_delay as f64).round() as u16);
                    }
                    _ => synapse.set_delay(rng.gen_range(0..=settings.max_delay)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_spreads_connections_within_one_of_the_mean() {
        let plan = plan_source_counts(10, 4, 100);
        assert_eq!(plan.iter().sum::<usize>(), 10);
        assert_eq!(plan, vec![3, 3, 2, 2]);
    }

    #[test]
    fn plan_exact_division_gives_every_source_the_mean() {
        assert_eq!(plan_source_counts(12, 4, 100), vec![3, 3, 3, 3]);
    }

    #[test]
    fn plan_with_fewer_connections_than_sources() {
        let plan = plan_source_counts(2, 5, 100);
        assert_eq!(plan, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn plan_respects_the_physical_cap() {
        let plan = plan_source_counts(100, 4, 10);
        assert!(plan.iter().all(|&c| c <= 10));
        assert_eq!(plan, vec![10, 10, 10, 10]);
    }
}
