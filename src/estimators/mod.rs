// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod active_information;
pub mod approaches;
pub mod auto_embed;
pub mod calculator;
pub mod entropy;
pub mod mutual_information;
pub mod significance;
pub mod traits;
pub mod transfer_entropy;
pub mod utils;

pub use traits::{AnalyticNull, GlobalValue, LocalValues, OptionalLocalValues, SurrogateMeasure};
