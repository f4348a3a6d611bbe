// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared across the reservoir crates

pub mod error;
pub mod ids;
pub mod spatial;

pub use error::{NeuralError, Result};
pub use ids::{InputId, NeuronId, PoolId};
pub use spatial::{PoolDimensions, Position};
