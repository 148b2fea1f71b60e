// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod common_nd;
pub mod discrete;
pub mod gaussian;
pub mod kernel;
pub mod kraskov;

// Unified re-exports for common estimators so tests and users can import
// infodynamics::estimators::approaches::* ergonomically.
pub use common_nd::dataset::ContinuousData;
pub use common_nd::joint_search::JointSearcher;
pub use common_nd::neighbour_search::{Neighbour, NeighbourSearchIndex, Norm};

pub use discrete::{
    DiscreteActiveInformation, DiscreteConditionalMutualInformation, DiscreteData, DiscreteEntropy,
    DiscreteMutualInformation, DiscreteTransferEntropy, MutualInformationDiscrete,
};
pub use gaussian::{
    Covariance, GaussianActiveInformation, GaussianConditionalMutualInformation, GaussianEntropy,
    GaussianMutualInformation, GaussianTransferEntropy,
};
pub use kernel::{
    KernelActiveInformation, KernelConditionalMutualInformation, KernelEntropy, KernelMutualInformation,
    KernelParams, KernelTransferEntropy,
};
pub use kraskov::{
    KozachenkoLeonenkoEntropy, KraskovActiveInformation, KraskovConditionalMutualInformation, KraskovEntropy,
    KraskovMutualInformation, KraskovTransferEntropy, KsgParams,
};
