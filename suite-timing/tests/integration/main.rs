// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that drive the timing plugin through whole suites.

mod fixtures;
mod properties;
