// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line options contributed by the timing plugin.
//!
//! Hosts flatten [`TimingOpts`] into their own parser:
//!
//! ```
//! use clap::Parser;
//! use suite_timing::options::TimingOpts;
//!
//! #[derive(Debug, Parser)]
//! struct HostOpts {
//!     #[clap(flatten)]
//!     timing: TimingOpts,
//! }
//!
//! let opts = HostOpts::parse_from(["host", "--with-timing", "--output-directory", "target/timings"]);
//! assert!(opts.timing.enabled);
//! assert_eq!(opts.timing.output_directory, "target/timings");
//! ```

use camino::Utf8PathBuf;
use clap::Args;

/// The default output directory.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".";

/// Options for the timing plugin.
#[derive(Clone, Debug, Args)]
#[must_use]
pub struct TimingOpts {
    /// Enable plugin timing: record setup, teardown and test timings
    #[arg(
        long = "with-timing",
        help_heading = "Timing options",
        env = "SUITE_TIMING_ENABLED"
    )]
    pub enabled: bool,

    /// Where to write JSON files
    #[arg(
        long,
        help_heading = "Timing options",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIRECTORY,
        env = "SUITE_TIMING_OUTPUT_DIRECTORY"
    )]
    pub output_directory: Utf8PathBuf,
}

impl TimingOpts {
    /// Creates enabled options writing to the given directory.
    pub fn enabled(output_directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            enabled: true,
            output_directory: output_directory.into(),
        }
    }
}

impl Default for TimingOpts {
    fn default() -> Self {
        Self {
            enabled: false,
            output_directory: DEFAULT_OUTPUT_DIRECTORY.into(),
        }
    }
}
