// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to the timing files written by `suite-timing`.
//!
//! A timing run produces two flat JSON documents in its output directory:
//!
//! * [`SETUP_JSON_FILE_NAME`]: one [`ContextTimingSummary`] per test context (module or class),
//!   keyed by the context's identity string.
//! * [`TESTS_JSON_FILE_NAME`]: one [`TestTimingSummary`] per test, keyed by the test ID.
//!
//! All durations are in seconds, as floating point numbers.

mod timings;

pub use timings::*;
