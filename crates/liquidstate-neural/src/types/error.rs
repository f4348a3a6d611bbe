// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the neural data model

use thiserror::Error;

/// Errors raised by the data-model layer.
///
/// Construction-level errors (pool ratios, empty scopes, spectral failures)
/// live in the genesis crate; this enum covers only invariant violations of
/// the model types themselves.
#[derive(Debug, Clone, Error)]
pub enum NeuralError {
    #[error("retainment rate {0} must lie in [0, {max})", max = crate::neuron::MAX_RETAINMENT)]
    RetainmentOutOfRange(f64),

    #[error("synapse bank slot {0} is out of bounds ({1} targets)")]
    TargetOutOfBounds(u32, usize),

    #[error("plasticity time constant must be positive, got {0}")]
    NonPositiveTimeConstant(f64),

    #[error("resting efficacy {0} must lie in (0, 1]")]
    RestingEfficacyOutOfRange(f64),
}

pub type Result<T> = core::result::Result<T, NeuralError>;
