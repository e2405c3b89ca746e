// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The objects a driver hands to the timing hooks: test contexts and test cases.
//!
//! A *context* is a test-grouping entity (a module or a class) that may carry shared setup and
//! teardown fixtures. A *test case* belongs to at most one context.

use crate::{
    errors::{DisplayErrorChain, IntrospectionError},
    fixture::Fixtures,
    helpers::absolute_path,
};
use camino::Utf8PathBuf;
use std::{
    fmt,
    panic::Location,
    sync::atomic::{AtomicU64, Ordering},
};
use suite_timing_metadata::SourceLocationSummary;
use tracing::debug;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies a single context instance.
///
/// Two distinct contexts always have distinct instance IDs, even if their
/// [`ContextIdentity`] values are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextInstanceId(u64);

impl ContextInstanceId {
    /// Allocates a new, process-unique instance ID.
    pub fn allocate() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an instance ID from a raw value.
    ///
    /// Drivers that already have a unique key for their contexts can use this instead of
    /// [`Self::allocate`]. Mixing the two within one run may produce collisions.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this ID.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context-{}", self.0)
    }
}

/// The reporting identity of a context.
///
/// The [`Display`](fmt::Display) form of this type is the *identity string* used as a key in
/// `setup.json`. Unlike [`ContextInstanceId`], identity strings may collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContextIdentity {
    /// A module, identified by its name alone.
    Module {
        /// The module name, e.g. `pkg.mod`.
        name: String,
    },

    /// A member of a module, such as a class.
    Member {
        /// The name of the owning module.
        module: String,

        /// The name of the member.
        name: String,
    },
}

impl ContextIdentity {
    /// Creates a module identity.
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module { name: name.into() }
    }

    /// Creates a member identity.
    pub fn member(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Member {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ContextIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module { name } => write!(f, "{name}"),
            Self::Member { module, name } => write!(f, "{module}.{name}"),
        }
    }
}

/// A source file and line, as reported by a driver.
///
/// The path may be relative, in which case it is resolved against the current directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// The path to the source file.
    pub path: Utf8PathBuf,

    /// The line number.
    pub line: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    pub fn new(path: impl Into<Utf8PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Returns the location of the caller.
    ///
    /// Paths produced by the compiler are relative to the workspace root for workspace crates,
    /// so this only resolves if the current directory is the workspace root.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Resolves this location to an absolute path to an existing file.
    pub fn resolve(&self) -> Result<SourceLocationSummary, IntrospectionError> {
        let name =
            absolute_path(&self.path).map_err(|error| IntrospectionError::NotAbsolute {
                path: self.path.clone(),
                message: error.to_string(),
            })?;
        if !name.is_file() {
            return Err(IntrospectionError::MissingFile { path: name });
        }

        Ok(SourceLocationSummary {
            name,
            line: self.line,
        })
    }
}

/// A test-grouping entity, such as a module or a class.
pub trait TestContext {
    /// Returns the ID of this particular context instance.
    fn instance_id(&self) -> ContextInstanceId;

    /// Returns the reporting identity of this context.
    fn identity(&self) -> &ContextIdentity;

    /// Returns where this context is defined.
    ///
    /// Contexts without a meaningful location (for example ones generated at runtime) should
    /// return an error.
    fn source_location(&self) -> Result<SourceLocation, IntrospectionError>;

    /// Returns this context's setup and teardown fixtures, if it has any.
    ///
    /// The timing hooks replace the fixtures in place with instrumented versions.
    fn fixtures_mut(&mut self) -> Option<&mut Fixtures> {
        None
    }
}

/// An individual test.
pub trait TestCase {
    /// Returns the ID of this test, used as its key in `tests.json`.
    fn id(&self) -> &str;

    /// Returns the context this test belongs to, if any.
    fn context(&self) -> Option<&dyn TestContext>;
}

/// Returns the resolved source file of a context, or `None` if it is unavailable.
pub(crate) fn context_source_file(context: &dyn TestContext) -> Option<SourceLocationSummary> {
    match context
        .source_location()
        .and_then(|location| location.resolve())
    {
        Ok(summary) => Some(summary),
        Err(error) => {
            debug!(
                identity = %context.identity(),
                "source location unavailable: {}",
                DisplayErrorChain::new(error)
            );
            None
        }
    }
}
