// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The name of the file that context timings are written to.
pub const SETUP_JSON_FILE_NAME: &str = "setup.json";

/// The name of the file that test timings are written to.
pub const TESTS_JSON_FILE_NAME: &str = "tests.json";

/// The contents of `setup.json`: context identity string to timings.
///
/// Serialized as a flat JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupTimingsSummary {
    /// Context timings, in the order contexts were first started.
    pub contexts: IndexMap<String, ContextTimingSummary>,
}

impl SetupTimingsSummary {
    /// Parse JSON output produced by a timing run.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json.as_ref())
    }
}

/// The contents of `tests.json`: test ID to timings.
///
/// Serialized as a flat JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestTimingsSummary {
    /// Test timings, in the order outcomes were first recorded.
    pub tests: IndexMap<String, TestTimingSummary>,
}

impl TestTimingsSummary {
    /// Parse JSON output produced by a timing run.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json.as_ref())
    }
}

/// Timings for a single test context (a module or a class).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextTimingSummary {
    /// Seconds from the start of the context to its end.
    pub total: f64,

    /// Seconds spent in the context's setup fixture, or 0 if it has none.
    pub set_up: f64,

    /// Seconds spent in the context's teardown fixture, or 0 if it has none.
    pub tear_down: f64,

    /// Where the context is defined.
    pub file: SourceFileSummary,
}

/// Timings for a single test.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestTimingSummary {
    /// Seconds from the start of the test to its first outcome.
    pub total: f64,

    /// Where the test's owning context is defined.
    pub file: SourceFileSummary,
}

/// The source file an object was defined in, if known.
///
/// Serialized as `{"name": ..., "line": ...}` if known and as `{}` otherwise. Deserialization
/// rejects objects with only one of the two fields, or with any other field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawSourceFile")]
pub enum SourceFileSummary {
    /// The location is known.
    Known(SourceLocationSummary),

    /// The location could not be determined.
    Unknown {},
}

impl Default for SourceFileSummary {
    fn default() -> Self {
        Self::Unknown {}
    }
}

impl SourceFileSummary {
    /// Returns the location, if known.
    pub fn location(&self) -> Option<&SourceLocationSummary> {
        match self {
            Self::Known(location) => Some(location),
            Self::Unknown {} => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSourceFile {
    name: Option<Utf8PathBuf>,
    line: Option<u32>,
}

impl TryFrom<RawSourceFile> for SourceFileSummary {
    type Error = &'static str;

    fn try_from(raw: RawSourceFile) -> Result<Self, Self::Error> {
        match (raw.name, raw.line) {
            (Some(name), Some(line)) => Ok(Self::Known(SourceLocationSummary { name, line })),
            (None, None) => Ok(Self::Unknown {}),
            (Some(_), None) => Err("source file has a `name` but no `line`"),
            (None, Some(_)) => Err("source file has a `line` but no `name`"),
        }
    }
}

impl From<Option<SourceLocationSummary>> for SourceFileSummary {
    fn from(location: Option<SourceLocationSummary>) -> Self {
        match location {
            Some(location) => Self::Known(location),
            None => Self::Unknown {},
        }
    }
}

/// An absolute file path and a line number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocationSummary {
    /// The absolute path to the file.
    pub name: Utf8PathBuf,

    /// The line number the object is defined at.
    pub line: u32,
}
