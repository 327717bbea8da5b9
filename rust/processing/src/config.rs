// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing configuration loaded from environment variables.

use smap_lite_core::ParseMode;

/// Default maximum map file size in MB.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 100;

/// Default map file extension.
pub const DEFAULT_EXTENSION: &str = "smap";

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// How strictly documents are parsed.
    pub mode: ParseMode,
    /// Number of worker threads for parallel parsing.
    pub worker_threads: usize,
    /// Maximum file size in MB.
    pub max_file_size_mb: usize,
    /// Extension of map files, without the dot.
    pub extension: String,
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            mode: std::env::var("SMAP_PARSE_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            worker_threads: std::env::var("WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB),
            extension: std::env::var("SMAP_EXTENSION")
                .map(|ext| ext.trim_start_matches('.').to_string())
                .ok()
                .filter(|ext| !ext.is_empty())
                .unwrap_or_else(|| DEFAULT_EXTENSION.into()),
        }
    }

    /// Maximum file size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb as u64 * 1024 * 1024
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            worker_threads: num_cpus::get(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            extension: DEFAULT_EXTENSION.into(),
        }
    }
}
