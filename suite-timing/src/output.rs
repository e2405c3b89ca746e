// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging for hosts that don't install their own `tracing` subscriber.

use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The environment variable used to configure log levels.
///
/// The value uses `tracing-subscriber`'s targets syntax, e.g. `suite_timing=debug`.
pub const LOG_ENV: &str = "SUITE_TIMING_LOG";

static INIT_LOGGER: Once = Once::new();

/// Installs a global subscriber that logs to stderr, filtered by [`LOG_ENV`].
///
/// Only the first call has any effect. If another global subscriber is already installed, it is
/// left in place.
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let targets = targets_from_env(std::env::var(LOG_ENV).ok().as_deref());

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(targets);

        // Hosts may have set up their own subscriber already: that isn't an error.
        _ = tracing_subscriber::registry().with(layer).try_init();
    });
}

fn targets_from_env(value: Option<&str>) -> Targets {
    let default = Targets::new().with_default(LevelFilter::INFO);
    match value {
        None | Some("") => default,
        Some(value) => match value.parse() {
            Ok(targets) => targets,
            Err(error) => {
                eprintln!("warning: ignoring invalid {LOG_ENV} value `{value}`: {error}");
                default
            }
        },
    }
}
