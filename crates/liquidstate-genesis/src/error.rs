// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Construction-time error taxonomy.
//!
//! Every variant is fatal: a malformed reservoir must never run, so errors
//! abort construction entirely and no partially-built reservoir escapes.
//! Soft conditions (a role pair with no eligible neurons, duplicate-edge
//! collisions) are handled inside the generators and are not errors.

use thiserror::Error;

use liquidstate_neural::NeuralError;

use crate::spectral::SpectralScope;

#[derive(Debug, Clone, Error)]
pub enum GenesisError {
    #[error("pool '{0}' has zero grid cells")]
    EmptyPool(String),

    #[error("pool '{0}' declares a zero total neuron-group share")]
    ZeroGroupShare(String),

    #[error("connection rule references unknown pool '{0}'")]
    UnknownPool(String),

    #[error("input field {input} requests {requested} targets in pool '{pool}' but its scope admits none")]
    EmptyInputScope {
        input: u32,
        pool: String,
        requested: usize,
    },

    #[error("spectral scope {0:?} contains no synapses to scale")]
    EmptySpectralScope(SpectralScope),

    #[error("spectral scope {0:?} has a degenerate (near-zero) dominant eigenvalue")]
    DegenerateSpectrum(SpectralScope),

    #[error(transparent)]
    Neural(#[from] NeuralError),
}

pub type GenesisResult<T> = Result<T, GenesisError>;
