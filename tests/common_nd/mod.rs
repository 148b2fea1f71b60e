// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the neighbour search structures and dataset preparation.
mod joint_search_tests;
mod neighbour_search_tests;
