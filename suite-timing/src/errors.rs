// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by suite-timing.

use crate::context::ContextInstanceId;
use camino::Utf8PathBuf;
use std::{error, fmt};
use thiserror::Error;

/// The source location of a context could not be determined.
///
/// This error is never surfaced by the recorder: contexts whose location is unavailable are
/// reported with an empty `file` entry instead.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum IntrospectionError {
    /// The context does not carry a source location, e.g. because it was generated at runtime.
    #[error("no source location is available for `{identity}`")]
    NoLocation {
        /// The identity string of the context.
        identity: String,
    },

    /// The context reported a source file that does not exist.
    #[error("source file `{path}` does not exist")]
    MissingFile {
        /// The path that was reported.
        path: Utf8PathBuf,
    },

    /// A relative source path could not be made absolute.
    #[error("unable to make `{path}` absolute: {message}")]
    NotAbsolute {
        /// The path that was reported.
        path: Utf8PathBuf,

        /// Why the path could not be resolved.
        message: String,
    },
}

impl IntrospectionError {
    /// Creates a new `NoLocation` error for the given identity.
    pub fn no_location(identity: impl Into<String>) -> Self {
        Self::NoLocation {
            identity: identity.into(),
        }
    }
}

/// An error that occurs while stopping a test context.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum StopContextError {
    /// A context was stopped without ever being started.
    ///
    /// This indicates a bug in the driver: under the lifecycle contract every stop is preceded by
    /// a start for the same context instance.
    #[error("context `{identity}` ({instance_id}) was stopped without being started")]
    MissingStartMarker {
        /// The identity string of the context.
        identity: String,

        /// The instance that was stopped.
        instance_id: ContextInstanceId,
    },

    /// A context was stopped under an identity string it was not started with.
    #[error(
        "context `{identity}` ({instance_id}) was stopped under an identity it was not started with"
    )]
    MissingRecord {
        /// The identity string the context was stopped with.
        identity: String,

        /// The instance that was stopped.
        instance_id: ContextInstanceId,
    },
}

/// An error that occurs while writing timing files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteTimingsError {
    /// The current directory could not be determined while resolving the output directory.
    #[error("error determining current directory to resolve `{destination}`")]
    CurrentDir {
        /// The configured output directory.
        destination: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while writing progress to the output stream.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// Timings could not be serialized.
    #[error("error serializing timings for `{path}`")]
    Serialize {
        /// The file being written.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// An error occurred while writing a timing file.
    #[error("error writing timings to `{path}`")]
    Write {
        /// The file being written.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<std::io::Error>,
    },
}

/// Displays an error along with its chain of sources.
///
/// Hosts can use this to print errors returned by the timing hooks:
///
/// ```
/// use suite_timing::{
///     errors::DisplayErrorChain,
///     options::TimingOpts,
///     plugin::{LifecycleHooks, TimingPlugin},
/// };
///
/// let mut plugin = TimingPlugin::configure(&TimingOpts::enabled("does/not/exist"));
/// plugin.begin();
/// let error = plugin
///     .report(&mut std::io::sink())
///     .expect_err("output directory does not exist");
/// let rendered = DisplayErrorChain::new(error).to_string();
/// assert!(rendered.starts_with("error writing timings to"));
/// ```
#[derive(Clone, Debug)]
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        if source.is_some() {
            write!(f, "\n  caused by:")?;
        }
        while let Some(cause) = source {
            write!(f, "\n  - {cause}")?;
            source = cause.source();
        }

        Ok(())
    }
}
