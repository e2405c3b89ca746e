// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::FixtureContext;
use camino_tempfile::Utf8TempDir;
use proptest::prelude::*;
use std::{collections::BTreeSet, sync::Arc, time::Duration};
use suite_timing::{
    clock::ManualClock,
    context::{ContextIdentity, TestCase, TestContext},
    options::TimingOpts,
    plugin::{LifecycleHooks, TimingPlugin},
};
use suite_timing_metadata::{SetupTimingsSummary, TestTimingsSummary};
use test_strategy::proptest;

const MODULES: [&str; 3] = ["pkg.test_a", "pkg.test_b", "pkg.test_c"];
const MEMBERS: [Option<&str>; 3] = [None, Some("TestOne"), Some("TestTwo")];

fn identity(module: usize, member: usize) -> ContextIdentity {
    match MEMBERS[member] {
        None => ContextIdentity::module(MODULES[module]),
        Some(name) => ContextIdentity::member(MODULES[module], name),
    }
}

// Contexts with colliding identities each run with their own instance, so every stop must find
// its start marker and the written files must hold one entry per distinct identity string.
#[proptest(cases = 64)]
fn one_entry_per_identity(
    #[strategy(proptest::collection::vec((0..3usize, 0..3usize, 0..100u64), 0..16))]
    runs: Vec<(usize, usize, u64)>,
) {
    let dir = Utf8TempDir::new().map_err(|error| TestCaseError::fail(error.to_string()))?;
    let clock = Arc::new(ManualClock::new());
    let mut plugin =
        TimingPlugin::configure_with_clock(&TimingOpts::enabled(dir.path()), clock.clone());

    let mut expected_contexts = BTreeSet::new();
    let mut expected_tests = BTreeSet::new();

    plugin.begin();
    for &(module, member, millis) in &runs {
        let mut context = FixtureContext::new(identity(module, member));
        expected_contexts.insert(context.identity().to_string());

        plugin.start_context(&mut context);
        {
            let test = context.test("test_it");
            expected_tests.insert(test.id().to_owned());
            plugin.start_test(&test);
            clock.advance(Duration::from_millis(millis));
            plugin.add_success(&test);
        }
        prop_assert!(plugin.stop_context(&context).is_ok());
    }
    prop_assert_eq!(plugin.recorder().map(|r| r.pending_contexts()), Some(0));

    let mut output = Vec::new();
    prop_assert!(plugin.report(&mut output).is_ok());
    let output = String::from_utf8_lossy(&output);
    prop_assert_eq!(output.lines().count(), 2, "one line per file written");

    let setup = std::fs::read_to_string(dir.path().join("setup.json"))
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    let setup = SetupTimingsSummary::parse_json(setup)
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    let tests = std::fs::read_to_string(dir.path().join("tests.json"))
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    let tests = TestTimingsSummary::parse_json(tests)
        .map_err(|error| TestCaseError::fail(error.to_string()))?;

    let contexts: BTreeSet<_> = setup.contexts.keys().cloned().collect();
    let test_ids: BTreeSet<_> = tests.tests.keys().cloned().collect();
    prop_assert_eq!(contexts, expected_contexts);
    prop_assert_eq!(test_ids, expected_tests);
}

// The last run of a colliding identity wins.
#[proptest(cases = 64)]
fn last_run_wins(#[strategy(proptest::collection::vec(1..500u64, 1..8))] durations: Vec<u64>) {
    let clock = Arc::new(ManualClock::new());
    let mut plugin =
        TimingPlugin::configure_with_clock(&TimingOpts::enabled("."), clock.clone());

    plugin.begin();
    for &millis in &durations {
        let mut context = FixtureContext::new(identity(0, 1));
        plugin.start_context(&mut context);
        clock.advance(Duration::from_millis(millis));
        prop_assert!(plugin.stop_context(&context).is_ok());
    }

    let last = *durations.last().expect("strategy generates at least one duration");
    let setup = plugin
        .recorder()
        .expect("plugin is enabled")
        .setup_summary();
    prop_assert_eq!(setup.contexts.len(), 1);
    prop_assert_eq!(
        setup.contexts["pkg.test_a.TestOne"].total,
        Duration::from_millis(last).as_secs_f64()
    );
}
