// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use color_eyre::eyre::Result;
use std::{sync::Arc, time::Duration};
use suite_timing::{
    clock::ManualClock,
    context::{ContextIdentity, ContextInstanceId, SourceLocation, TestCase, TestContext},
    errors::IntrospectionError,
    fixture::{FixtureResult, Fixtures},
    plugin::LifecycleHooks,
};

/// How a fixture test finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FixtureStatus {
    Pass,
    Fail,
    Error,
}

#[derive(Clone, Debug)]
pub(crate) struct FixtureTestSpec {
    pub(crate) name: &'static str,
    pub(crate) status: FixtureStatus,
    pub(crate) duration: Duration,
}

impl FixtureTestSpec {
    pub(crate) fn new(name: &'static str, status: FixtureStatus, millis: u64) -> Self {
        Self {
            name,
            status,
            duration: Duration::from_millis(millis),
        }
    }
}

/// A module or class under test.
#[derive(Debug)]
pub(crate) struct FixtureContext {
    instance_id: ContextInstanceId,
    identity: ContextIdentity,
    location: Option<SourceLocation>,
    fixtures: Option<Fixtures>,
    tests: Vec<FixtureTestSpec>,
}

impl FixtureContext {
    pub(crate) fn new(identity: ContextIdentity) -> Self {
        Self {
            instance_id: ContextInstanceId::allocate(),
            identity,
            location: None,
            fixtures: None,
            tests: Vec::new(),
        }
    }

    pub(crate) fn with_location(mut self, path: impl Into<Utf8PathBuf>, line: u32) -> Self {
        self.location = Some(SourceLocation::new(path, line));
        self
    }

    pub(crate) fn with_fixtures(mut self, fixtures: Fixtures) -> Self {
        self.fixtures = Some(fixtures);
        self
    }

    pub(crate) fn with_test(mut self, spec: FixtureTestSpec) -> Self {
        self.tests.push(spec);
        self
    }

    pub(crate) fn test(&self, name: &str) -> FixtureTest<'_> {
        FixtureTest {
            id: format!("{}.{name}", self.identity),
            context: self,
        }
    }

    pub(crate) fn run_set_up(&mut self) -> Option<FixtureResult> {
        self.fixtures.as_mut().and_then(|fixtures| fixtures.run_set_up())
    }

    pub(crate) fn run_tear_down(&mut self) -> Option<FixtureResult> {
        self.fixtures
            .as_mut()
            .and_then(|fixtures| fixtures.run_tear_down())
    }
}

impl TestContext for FixtureContext {
    fn instance_id(&self) -> ContextInstanceId {
        self.instance_id
    }

    fn identity(&self) -> &ContextIdentity {
        &self.identity
    }

    fn source_location(&self) -> Result<SourceLocation, IntrospectionError> {
        self.location
            .clone()
            .ok_or_else(|| IntrospectionError::no_location(self.identity.to_string()))
    }

    fn fixtures_mut(&mut self) -> Option<&mut Fixtures> {
        self.fixtures.as_mut()
    }
}

pub(crate) struct FixtureTest<'a> {
    id: String,
    context: &'a FixtureContext,
}

impl TestCase for FixtureTest<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> Option<&dyn TestContext> {
        Some(self.context)
    }
}

/// Returns fixtures that advance `clock` by the given amounts.
pub(crate) fn clock_fixtures(
    clock: &Arc<ManualClock>,
    set_up_ms: u64,
    tear_down_ms: u64,
) -> Fixtures {
    let set_up_clock = clock.clone();
    let tear_down_clock = clock.clone();
    Fixtures::new()
        .with_set_up(move || {
            set_up_clock.advance(Duration::from_millis(set_up_ms));
            Ok(())
        })
        .with_tear_down(move || {
            tear_down_clock.advance(Duration::from_millis(tear_down_ms));
            Ok(())
        })
}

/// Runs contexts serially through `hooks`, the way a single-threaded test runner would.
///
/// Test bodies "run" by advancing `clock`. Fixture errors are ignored, like a runner that records
/// them and carries on.
pub(crate) fn run_suite(
    hooks: &mut dyn LifecycleHooks,
    clock: &ManualClock,
    contexts: &mut [FixtureContext],
) -> Result<()> {
    hooks.begin();

    for context in contexts {
        hooks.start_context(context);
        _ = context.run_set_up();

        for spec in context.tests.clone() {
            let test = context.test(spec.name);
            hooks.start_test(&test);
            clock.advance(spec.duration);
            match spec.status {
                FixtureStatus::Pass => hooks.add_success(&test),
                FixtureStatus::Fail => hooks.add_failure(&test),
                FixtureStatus::Error => hooks.add_error(&test),
            }
        }

        _ = context.run_tear_down();
        hooks.stop_context(context)?;
    }

    Ok(())
}
