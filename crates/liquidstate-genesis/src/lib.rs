// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Reservoir Genesis - Construction of the Dynamical System.

This crate develops a functional reservoir (phenotype) from resolved
settings (genotype). It coordinates:

1. **Topology growth**: instantiating neurons per pool and neuron group
2. **Synaptogenesis**: wiring input and recurrent synapse banks under
   density, role-ratio, and distance constraints
3. **Delay assignment**: distance-mapped or randomized conduction delays
4. **Spectral scaling**: rescaling recurrent weights to a target dominant
   eigenvalue magnitude

All stochastic decisions draw from one explicitly passed seeded random
source; an identical seed reproduces an identical reservoir.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connectivity;
pub mod develop;
pub mod error;
pub mod settings;
pub mod spectral;
pub mod topology;

pub use develop::develop;
pub use error::{GenesisError, GenesisResult};
pub use settings::{
    DelayMethod, DelaySettings, GroupModelSettings, InputConnectionSettings, InterconnectSettings,
    NeuronGroupSettings, PoolSettings, ReservoirSettings, RetainmentSettings, RoleScope,
    SpectralTargets, TargetScope, ValueDist,
};
pub use spectral::SpectralScope;
pub use topology::Topology;
