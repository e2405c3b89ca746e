// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Test-run instrumentation that records how long test contexts, their setup and teardown
//! fixtures, and individual tests take.
//!
//! A test driver calls the [`LifecycleHooks`](plugin::LifecycleHooks) of a
//! [`TimingPlugin`](plugin::TimingPlugin) as it runs a suite. At the end of the run the plugin
//! writes two JSON files to the configured output directory:
//!
//! * `setup.json`, mapping each context's identity string to its total, setup and teardown times;
//! * `tests.json`, mapping each test ID to its total time.
//!
//! The file formats are described by the
//! [`suite-timing-metadata`](suite_timing_metadata) crate.

pub mod clock;
pub mod context;
pub mod errors;
pub mod fixture;
mod helpers;
pub mod options;
pub mod output;
pub mod plugin;
pub mod recorder;
pub mod reporter;
