// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidstate Simulation Engine
//!
//! The [`Reservoir`] object: owns the flat neuron array and both synapse
//! banks, runs the discrete stimulate/settle cycle in parallel over
//! partitioned neuron ranges, and exposes predictor extraction plus a
//! health-metrics aggregate.
//!
//! ## Cycle structure
//!
//! Each `compute` call runs two strictly ordered, barrier-separated phases:
//!
//! 1. **Stimulation collection** - every neuron sums the delayed signal of
//!    its inbound input and recurrent synapses into two separate
//!    accumulators. Sources are read from a snapshot of the previous
//!    cycle's outputs; no neuron ever observes a same-cycle state.
//! 2. **State update** - every neuron folds accumulated stimulation, bias,
//!    and prior state into its new state and output signal.
//!
//! Workers own disjoint (neuron, bank-slot) triples, so no locking is
//! needed anywhere on the steady-state path.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod reservoir;
pub mod statistics;

pub use reservoir::{PoolRange, Reservoir};
pub use statistics::{ReservoirStatistics, StatSummary};
