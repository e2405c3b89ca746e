// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Setup and teardown fixtures, and the wrapper that times them.

use crate::clock::Clock;
use debug_ignore::DebugIgnore;
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// The error type returned by a failing fixture.
pub type FixtureError = Box<dyn std::error::Error + Send + Sync>;

/// The result of running a fixture.
pub type FixtureResult = Result<(), FixtureError>;

/// A setup or teardown fixture.
pub type Fixture = Box<dyn FnMut() -> FixtureResult + Send>;

/// The setup and teardown fixtures of a context.
#[derive(Debug, Default)]
pub struct Fixtures {
    set_up: Option<DebugIgnore<Fixture>>,
    tear_down: Option<DebugIgnore<Fixture>>,
}

impl Fixtures {
    /// Creates an empty set of fixtures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the setup fixture.
    pub fn with_set_up(
        mut self,
        set_up: impl FnMut() -> FixtureResult + Send + 'static,
    ) -> Self {
        self.set_up = Some(DebugIgnore(Box::new(set_up)));
        self
    }

    /// Sets the teardown fixture.
    pub fn with_tear_down(
        mut self,
        tear_down: impl FnMut() -> FixtureResult + Send + 'static,
    ) -> Self {
        self.tear_down = Some(DebugIgnore(Box::new(tear_down)));
        self
    }

    /// Returns true if a setup fixture is present.
    pub fn has_set_up(&self) -> bool {
        self.set_up.is_some()
    }

    /// Returns true if a teardown fixture is present.
    pub fn has_tear_down(&self) -> bool {
        self.tear_down.is_some()
    }

    /// Runs the setup fixture, returning `None` if there isn't one.
    pub fn run_set_up(&mut self) -> Option<FixtureResult> {
        self.set_up.as_mut().map(|f| (f.0)())
    }

    /// Runs the teardown fixture, returning `None` if there isn't one.
    pub fn run_tear_down(&mut self) -> Option<FixtureResult> {
        self.tear_down.as_mut().map(|f| (f.0)())
    }

    /// Replaces each present fixture with one that records its elapsed time into the matching
    /// slot.
    pub(crate) fn instrument(
        &mut self,
        set_up: &ElapsedSlot,
        tear_down: &ElapsedSlot,
        clock: &Arc<dyn Clock>,
    ) {
        for (fixture, slot) in [(&mut self.set_up, set_up), (&mut self.tear_down, tear_down)] {
            if let Some(DebugIgnore(inner)) = fixture.take() {
                let wrapped: Fixture = Box::new(record_elapsed(inner, slot.clone(), clock.clone()));
                *fixture = Some(DebugIgnore(wrapped));
            }
        }
    }
}

/// A duration shared between a timing wrapper and the record it reports into.
#[derive(Clone, Debug, Default)]
pub struct ElapsedSlot(Arc<Mutex<Duration>>);

impl ElapsedSlot {
    /// Creates a new slot holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored duration.
    pub fn get(&self) -> Duration {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a duration, replacing the previous one.
    pub fn set(&self, elapsed: Duration) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = elapsed;
    }
}

/// Wraps `f` so that every call stores its elapsed time in `slot`.
///
/// The wrapper returns exactly what `f` returns. The elapsed time is stored even if `f` panics;
/// the panic then continues to unwind.
pub fn record_elapsed<R>(
    mut f: impl FnMut() -> R,
    slot: ElapsedSlot,
    clock: Arc<dyn Clock>,
) -> impl FnMut() -> R {
    move || {
        let _guard = ElapsedGuard {
            start: clock.now(),
            slot: &slot,
            clock: &*clock,
        };
        f()
    }
}

struct ElapsedGuard<'a> {
    start: Instant,
    slot: &'a ElapsedSlot,
    clock: &'a dyn Clock,
}

impl Drop for ElapsedGuard<'_> {
    fn drop(&mut self) {
        self.slot
            .set(self.clock.now().saturating_duration_since(self.start));
    }
}
