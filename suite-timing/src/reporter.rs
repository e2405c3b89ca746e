// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes recorded timings to disk.

use crate::{errors::WriteTimingsError, helpers::absolute_path};
use camino::{Utf8Path, Utf8PathBuf};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;
use std::io::Write;
use suite_timing_metadata::{
    SETUP_JSON_FILE_NAME, SetupTimingsSummary, TESTS_JSON_FILE_NAME, TestTimingsSummary,
};
use tracing::debug;

/// Writes `setup.json` and `tests.json` to an output directory.
#[derive(Debug)]
pub struct TimingReporter {
    destination: Utf8PathBuf,
    styles: Styles,
}

impl TimingReporter {
    /// Creates a new reporter writing to `destination`.
    ///
    /// A relative destination is resolved against the current directory at the time timings are
    /// written. The directory must already exist.
    pub fn new(destination: impl Into<Utf8PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            styles: Styles::default(),
        }
    }

    /// Colorizes progress output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Returns the configured destination directory.
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Writes both timing files, overwriting existing ones. A progress line is written to
    /// `writer` before each file.
    ///
    /// Returns the paths written to, in order.
    pub fn write_timings(
        &self,
        setup: &SetupTimingsSummary,
        tests: &TestTimingsSummary,
        mut writer: impl Write,
    ) -> Result<[Utf8PathBuf; 2], WriteTimingsError> {
        let dir =
            absolute_path(&self.destination).map_err(|error| WriteTimingsError::CurrentDir {
                destination: self.destination.clone(),
                error,
            })?;

        let setup_path = dir.join(SETUP_JSON_FILE_NAME);
        self.write_json(&setup_path, setup, &mut writer)?;
        let tests_path = dir.join(TESTS_JSON_FILE_NAME);
        self.write_json(&tests_path, tests, &mut writer)?;

        Ok([setup_path, tests_path])
    }

    fn write_json<T: Serialize>(
        &self,
        path: &Utf8Path,
        value: &T,
        mut writer: impl Write,
    ) -> Result<(), WriteTimingsError> {
        writeln!(
            writer,
            "{} {}",
            "Writing to".style(self.styles.heading),
            path.style(self.styles.bold),
        )
        .map_err(WriteTimingsError::Io)?;

        let json =
            serde_json::to_vec_pretty(value).map_err(|error| WriteTimingsError::Serialize {
                path: path.to_owned(),
                error,
            })?;

        atomicwrites::AtomicFile::new(path, atomicwrites::AllowOverwrite)
            .write(|file| file.write_all(&json))
            .map_err(|error| WriteTimingsError::Write {
                path: path.to_owned(),
                error,
            })?;

        debug!(%path, bytes = json.len(), "wrote timings");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Styles {
    bold: Style,
    heading: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.bold = Style::new().bold();
        self.heading = Style::new().green().bold();
    }
}
