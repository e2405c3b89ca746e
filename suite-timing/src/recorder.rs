// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records how long contexts, their fixtures, and tests take.
//!
//! The recorder keeps two tables keyed by identity string, one for contexts and one for tests,
//! plus the transient start markers needed to compute elapsed times:
//!
//! * Context start markers are keyed by [`ContextInstanceId`], not by identity string. Two
//!   contexts with the same identity string therefore time independently, even though only the
//!   record of the one started last survives in the context table.
//! * There's a single start marker for tests, since tests run serially. It is overwritten by every
//!   test start and is *not* cleared when an outcome is recorded: an outcome without a matching
//!   start reuses the previous test's start time.

use crate::{
    clock::{Clock, SystemClock},
    context::{ContextInstanceId, TestCase, TestContext, context_source_file},
    errors::StopContextError,
    fixture::ElapsedSlot,
};
use indexmap::IndexMap;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use suite_timing_metadata::{
    ContextTimingSummary, SetupTimingsSummary, SourceLocationSummary, TestTimingSummary,
    TestTimingsSummary,
};
use tracing::debug;

/// Records elapsed times for a single test suite run.
///
/// Each hook takes `&mut self`: the recorder assumes a serial driver. Drivers that run tests in
/// parallel must serialize calls into the recorder themselves.
#[derive(Debug)]
pub struct TimingRecorder {
    clock: Arc<dyn Clock>,
    context_timings: IndexMap<String, ContextRecord>,
    test_timings: IndexMap<String, TestRecord>,
    context_starts: HashMap<ContextInstanceId, Instant>,
    current_test_start: Option<Instant>,
}

impl TimingRecorder {
    /// Creates a new recorder using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a new recorder using the given clock.
    ///
    /// Fixture wrappers installed by this recorder use the same clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            context_timings: IndexMap::new(),
            test_timings: IndexMap::new(),
            context_starts: HashMap::new(),
            current_test_start: None,
        }
    }

    /// Resets all recorded state. Called at the start of a suite run.
    pub fn begin(&mut self) {
        self.context_timings.clear();
        self.test_timings.clear();
        self.context_starts.clear();
        self.current_test_start = None;
    }

    /// Starts timing a context, and instruments its fixtures.
    ///
    /// Any existing record for the same identity string is replaced.
    pub fn start_context(&mut self, context: &mut dyn TestContext) {
        let key = context.identity().to_string();
        let record = ContextRecord::new(context_source_file(context));

        if let Some(fixtures) = context.fixtures_mut() {
            fixtures.instrument(&record.set_up, &record.tear_down, &self.clock);
        }

        if self.context_timings.insert(key.clone(), record).is_some() {
            debug!(identity = %key, "replacing timings for context with the same identity");
        }

        let instance_id = context.instance_id();
        self.context_starts.insert(instance_id, self.clock.now());
        debug!(identity = %key, %instance_id, "context started");
    }

    /// Stops timing a context, returning its total elapsed time.
    ///
    /// Returns an error if this context instance was never started, or if no record exists under
    /// its current identity string. The start marker is consumed either way, but no record is
    /// created or updated on error.
    pub fn stop_context(
        &mut self,
        context: &dyn TestContext,
    ) -> Result<Duration, StopContextError> {
        let end = self.clock.now();
        let instance_id = context.instance_id();
        let key = context.identity().to_string();

        let start = self.context_starts.remove(&instance_id).ok_or_else(|| {
            StopContextError::MissingStartMarker {
                identity: key.clone(),
                instance_id,
            }
        })?;
        let elapsed = end.saturating_duration_since(start);

        let Some(record) = self.context_timings.get_mut(&key) else {
            return Err(StopContextError::MissingRecord {
                identity: key,
                instance_id,
            });
        };
        record.total = elapsed;

        debug!(identity = %key, %instance_id, ?elapsed, "context stopped");
        Ok(elapsed)
    }

    /// Marks the start of a test, replacing any previous start.
    pub fn start_test(&mut self, _test: &dyn TestCase) {
        self.current_test_start = Some(self.clock.now());
    }

    /// Records the outcome of a test, returning its elapsed time.
    ///
    /// Errors, failures and successes are all recorded the same way. If no test was ever started,
    /// the elapsed time is zero.
    pub fn record_outcome(&mut self, test: &dyn TestCase) -> Duration {
        let total = match self.current_test_start {
            Some(start) => self.clock.now().saturating_duration_since(start),
            None => {
                debug!(test = test.id(), "outcome recorded without a test start");
                Duration::ZERO
            }
        };
        let file = test.context().and_then(|context| context_source_file(context));

        self.test_timings
            .insert(test.id().to_owned(), TestRecord { total, file });
        total
    }

    /// Returns the number of contexts that were started but not yet stopped.
    pub fn pending_contexts(&self) -> usize {
        self.context_starts.len()
    }

    /// Returns a snapshot of the context timings.
    pub fn setup_summary(&self) -> SetupTimingsSummary {
        let contexts = self
            .context_timings
            .iter()
            .map(|(key, record)| (key.clone(), record.to_summary()))
            .collect();
        SetupTimingsSummary { contexts }
    }

    /// Returns a snapshot of the test timings.
    pub fn test_summary(&self) -> TestTimingsSummary {
        let tests = self
            .test_timings
            .iter()
            .map(|(key, record)| {
                let summary = TestTimingSummary {
                    total: record.total.as_secs_f64(),
                    file: record.file.clone().into(),
                };
                (key.clone(), summary)
            })
            .collect();
        TestTimingsSummary { tests }
    }
}

impl Default for TimingRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct ContextRecord {
    total: Duration,
    set_up: ElapsedSlot,
    tear_down: ElapsedSlot,
    file: Option<SourceLocationSummary>,
}

impl ContextRecord {
    fn new(file: Option<SourceLocationSummary>) -> Self {
        Self {
            total: Duration::ZERO,
            set_up: ElapsedSlot::new(),
            tear_down: ElapsedSlot::new(),
            file,
        }
    }

    fn to_summary(&self) -> ContextTimingSummary {
        ContextTimingSummary {
            total: self.total.as_secs_f64(),
            set_up: self.set_up.get().as_secs_f64(),
            tear_down: self.tear_down.get().as_secs_f64(),
            file: self.file.clone().into(),
        }
    }
}

#[derive(Debug)]
struct TestRecord {
    total: Duration,
    file: Option<SourceLocationSummary>,
}
