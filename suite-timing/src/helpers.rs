// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Makes a path absolute by joining it onto the current directory. The path is not normalized.
pub(crate) fn absolute_path(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
    Ok(cwd.join(path))
}
