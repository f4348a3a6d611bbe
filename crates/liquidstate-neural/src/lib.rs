// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidstate Neural Data Model (Platform-Agnostic)
//!
//! ALL reservoir data structures in one place:
//! - **Types**: Core type definitions (NeuronId, PoolId, Position, errors)
//! - **Neuron**: Analog and spiking neuron variants with leaky integration
//! - **Synapse**: Static and dynamic synapses, delay lines, per-target banks
//! - **Stats**: Running-statistics primitives shared by the engine
//!
//! This crate has no knowledge of how a reservoir is built or simulated;
//! it only defines the units the construction and simulation layers share.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Neuron variants and state
pub mod neuron;

// Synapse variants, delay lines, and banks
pub mod synapse;

// Running statistics primitives
pub mod stats;

// Re-export the common surface for convenience
pub use neuron::{
    ActivationKind, AnalogActivation, Neuron, NeuronModel, NeuronRole, Placement, MAX_RETAINMENT,
};
pub use stats::{NeuronStats, RunningStat};
pub use synapse::{
    DelayLine, PlasticitySettings, PlasticityState, Synapse, SynapseBank, SynapseKind,
    SynapseSource,
};
pub use types::{InputId, NeuralError, NeuronId, PoolDimensions, PoolId, Position, Result};
