// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle hooks, and the timing plugin that implements them.
//!
//! A driver runs a suite by calling the hooks of [`LifecycleHooks`] in this order:
//!
//! ```text
//! begin
//! start_context(ctx)            once per context, nested contexts are allowed
//!   start_test(test)
//!   add_error | add_failure | add_success (test)
//! stop_context(ctx)
//! report(stream)
//! ```
//!
//! Drivers that produce events rather than calling methods can use
//! [`LifecycleHooks::handle_event`] instead.

use crate::{
    clock::{Clock, SystemClock},
    context::{TestCase, TestContext},
    errors::{StopContextError, WriteTimingsError},
    options::TimingOpts,
    recorder::TimingRecorder,
    reporter::TimingReporter,
};
use std::{io::Write, sync::Arc};
use tracing::{debug, warn};

/// Hooks invoked by a test driver over the course of a suite run.
///
/// All hooks default to doing nothing.
pub trait LifecycleHooks {
    /// Called once before any context or test starts.
    fn begin(&mut self) {}

    /// Called when a context starts, before its setup fixture runs.
    fn start_context(&mut self, _context: &mut dyn TestContext) {}

    /// Called when a context ends, after its teardown fixture runs.
    fn stop_context(&mut self, _context: &dyn TestContext) -> Result<(), StopContextError> {
        Ok(())
    }

    /// Called when a test starts.
    fn start_test(&mut self, _test: &dyn TestCase) {}

    /// Called when a test errors.
    fn add_error(&mut self, _test: &dyn TestCase) {}

    /// Called when a test fails.
    fn add_failure(&mut self, _test: &dyn TestCase) {}

    /// Called when a test succeeds.
    fn add_success(&mut self, _test: &dyn TestCase) {}

    /// Called once after all tests are done.
    fn report(&mut self, _writer: &mut dyn Write) -> Result<(), WriteTimingsError> {
        Ok(())
    }

    /// Dispatches an event to the matching hook.
    fn handle_event(&mut self, event: LifecycleEvent<'_>) -> Result<(), StopContextError> {
        match event {
            LifecycleEvent::SuiteStarted => self.begin(),
            LifecycleEvent::ContextStarted { context } => self.start_context(context),
            LifecycleEvent::ContextStopped { context } => self.stop_context(context)?,
            LifecycleEvent::TestStarted { test } => self.start_test(test),
            LifecycleEvent::TestFinished { test, outcome } => match outcome {
                TestOutcome::Error => self.add_error(test),
                TestOutcome::Failure => self.add_failure(test),
                TestOutcome::Success => self.add_success(test),
            },
        }
        Ok(())
    }
}

/// A lifecycle event, for drivers that dispatch events rather than calling hooks.
#[non_exhaustive]
pub enum LifecycleEvent<'a> {
    /// The suite started.
    SuiteStarted,

    /// A context started.
    ContextStarted {
        /// The context. Its fixtures may be replaced.
        context: &'a mut dyn TestContext,
    },

    /// A context stopped.
    ContextStopped {
        /// The context.
        context: &'a dyn TestContext,
    },

    /// A test started.
    TestStarted {
        /// The test.
        test: &'a dyn TestCase,
    },

    /// A test reached a terminal outcome.
    TestFinished {
        /// The test.
        test: &'a dyn TestCase,

        /// How the test finished.
        outcome: TestOutcome,
    },
}

/// The terminal outcome of a test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    /// The test raised an unexpected error.
    Error,

    /// An assertion in the test failed.
    Failure,

    /// The test passed.
    Success,
}

/// Records context, fixture and test timings and writes them out at the end of the run.
///
/// A disabled plugin ignores every hook.
#[derive(Debug)]
pub struct TimingPlugin {
    inner: Option<TimingPluginInner>,
}

#[derive(Debug)]
struct TimingPluginInner {
    recorder: TimingRecorder,
    reporter: TimingReporter,
}

impl TimingPlugin {
    /// The name of this plugin.
    pub const NAME: &'static str = "timing";

    /// Configures the plugin from options, using the system clock.
    pub fn configure(opts: &TimingOpts) -> Self {
        Self::configure_with_clock(opts, Arc::new(SystemClock))
    }

    /// Configures the plugin from options, using the given clock.
    pub fn configure_with_clock(opts: &TimingOpts, clock: Arc<dyn Clock>) -> Self {
        if !opts.enabled {
            debug!("timing plugin disabled");
            return Self { inner: None };
        }

        debug!(output_directory = %opts.output_directory, "timing plugin enabled");
        Self {
            inner: Some(TimingPluginInner {
                recorder: TimingRecorder::with_clock(clock),
                reporter: TimingReporter::new(opts.output_directory.clone()),
            }),
        }
    }

    /// Returns true if the plugin is enabled.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Colorizes progress output written by [`LifecycleHooks::report`].
    pub fn colorize(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.reporter.colorize();
        }
    }

    /// Returns the recorder, if the plugin is enabled.
    pub fn recorder(&self) -> Option<&TimingRecorder> {
        self.inner.as_ref().map(|inner| &inner.recorder)
    }

    fn record_outcome(&mut self, test: &dyn TestCase) {
        if let Some(inner) = &mut self.inner {
            inner.recorder.record_outcome(test);
        }
    }
}

impl LifecycleHooks for TimingPlugin {
    fn begin(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.recorder.begin();
        }
    }

    fn start_context(&mut self, context: &mut dyn TestContext) {
        if let Some(inner) = &mut self.inner {
            inner.recorder.start_context(context);
        }
    }

    fn stop_context(&mut self, context: &dyn TestContext) -> Result<(), StopContextError> {
        if let Some(inner) = &mut self.inner {
            inner.recorder.stop_context(context)?;
        }
        Ok(())
    }

    fn start_test(&mut self, test: &dyn TestCase) {
        if let Some(inner) = &mut self.inner {
            inner.recorder.start_test(test);
        }
    }

    fn add_error(&mut self, test: &dyn TestCase) {
        self.record_outcome(test);
    }

    fn add_failure(&mut self, test: &dyn TestCase) {
        self.record_outcome(test);
    }

    fn add_success(&mut self, test: &dyn TestCase) {
        self.record_outcome(test);
    }

    fn report(&mut self, writer: &mut dyn Write) -> Result<(), WriteTimingsError> {
        let Some(inner) = &self.inner else {
            return Ok(());
        };

        let pending = inner.recorder.pending_contexts();
        if pending > 0 {
            warn!("{pending} context(s) were started but never stopped");
        }

        inner.reporter.write_timings(
            &inner.recorder.setup_summary(),
            &inner.recorder.test_summary(),
            writer,
        )?;
        Ok(())
    }
}
