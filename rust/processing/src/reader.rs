// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map file discovery and loading.

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use smap_lite_core::{parse_str, ParseOutcome};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read and parse one map file in the configured mode.
pub fn read_map_file(path: &Path, config: &ProcessingConfig) -> Result<ParseOutcome> {
    let size = fs::metadata(path)
        .map_err(|e| ProcessingError::io(path, e))?
        .len();
    let max = config.max_file_size_bytes();
    if size > max {
        return Err(ProcessingError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max,
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ProcessingError::io(path, e))?;
    tracing::debug!(path = %path.display(), size, mode = %config.mode, "Parsing map file");
    Ok(parse_str(&content, config.mode)?)
}

/// Files in `dir` with the given extension, sorted by path.
///
/// The extension match ignores ASCII case; subdirectories are not entered.
pub fn find_map_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
