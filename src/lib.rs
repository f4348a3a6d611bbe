// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidstate - Reservoir Computing Core
//!
//! A reservoir is a large, sparsely and randomly interconnected population
//! of excitatory/inhibitory neurons (analog leaky integrators or spiking
//! LIF units) driven by an external input stream and read out by a separate
//! trainable layer. This workspace provides the fixed dynamical system -
//! construction and simulation - as a nonlinear temporal feature extractor;
//! readout training, input encoding, and configuration parsing are external
//! collaborators.
//!
//! ## Components
//!
//! - [`neural`] - data model: neurons, synapses, delay lines, banks
//! - [`genesis`] - construction: topology, synaptogenesis, spectral scaling
//! - [`engine`] - simulation: the [`Reservoir`] object and cycle execution
//!
//! ## Quick Start
//!
//! ```no_run
//! use liquidstate::genesis::{develop, ReservoirSettings};
//!
//! # fn settings() -> ReservoirSettings { unimplemented!() }
//! let settings: ReservoirSettings = settings();
//! let mut reservoir = develop(&settings, 42).unwrap();
//!
//! let mut predictors = vec![0.0; reservoir.predictor_count()];
//! for input in [[0.1], [0.4], [0.9]] {
//!     reservoir.compute(&input, true);
//!     reservoir.copy_predictors_to(&mut predictors, 0);
//! }
//! println!("{}", reservoir.collect_statistics());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: liquidstate-neural                         │
//! │  (Neuron, Synapse, DelayLine, SynapseBank)              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Simulation: liquidstate-engine                         │
//! │  (Reservoir, two-phase parallel cycle, statistics)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Construction: liquidstate-genesis                      │
//! │  (Topology, synaptogenesis, spectral normalization)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub use liquidstate_engine as engine;
pub use liquidstate_genesis as genesis;
pub use liquidstate_neural as neural;

// Primary surface re-exported at the root
pub use liquidstate_engine::{PoolRange, Reservoir, ReservoirStatistics};
pub use liquidstate_genesis::{develop, GenesisError, GenesisResult, ReservoirSettings};
