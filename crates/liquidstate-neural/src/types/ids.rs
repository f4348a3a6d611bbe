// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identity types for neurons, pools, and input fields

use core::fmt;

use serde::{Deserialize, Serialize};

/// Neuron ID (index into the flat reservoir neuron array)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub u32);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neuron({})", self.0)
    }
}

impl NeuronId {
    /// The neuron's position in the flat array.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pool ID (index into the reservoir's pool partition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub u32);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pool({})", self.0)
    }
}

/// Input field ID (index into the per-cycle input vector)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InputId(pub u32);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input({})", self.0)
    }
}

impl InputId {
    /// The field's position in the input vector.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
