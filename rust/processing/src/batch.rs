// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel batch parsing.

use crate::config::ProcessingConfig;
use crate::reader::read_map_file;
use crate::summary::MapSummary;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smap_lite_core::parse_str;
use std::path::PathBuf;
use std::time::Instant;

/// Outcome for one input of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    /// File path or caller-supplied document name.
    pub source: String,
    pub result: Result<MapSummary, String>,
}

impl BatchEntry {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    /// Wall-clock time of the whole batch (ms).
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &MapSummary)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().ok().map(|s| (e.source.as_str(), s)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|m| (e.source.as_str(), m.as_str())))
    }
}

/// Run `job` over `inputs` on a pool of `threads` workers
///
/// Falls back to the global rayon pool when a dedicated pool cannot be built.
fn run_parallel<T, F>(inputs: &[T], threads: usize, job: F) -> Vec<BatchEntry>
where
    T: Sync,
    F: Fn(&T) -> BatchEntry + Sync + Send,
{
    let run = || inputs.par_iter().map(&job).collect::<Vec<_>>();
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build worker pool, using global pool");
            run()
        }
    }
}

fn finish(entries: Vec<BatchEntry>, start: Instant) -> BatchReport {
    let report = BatchReport {
        entries,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    for (source, error) in report.failed() {
        tracing::warn!(source, error, "Map failed to parse");
    }
    tracing::info!(
        total = report.entries.len(),
        succeeded = report.succeeded().count(),
        elapsed_ms = report.elapsed_ms,
        "Batch complete"
    );
    report
}

/// Read and summarize map files in parallel.
pub fn parse_batch(paths: &[PathBuf], config: &ProcessingConfig) -> BatchReport {
    let start = Instant::now();
    tracing::info!(
        files = paths.len(),
        worker_threads = config.worker_threads,
        mode = %config.mode,
        "Starting map batch"
    );

    let entries = run_parallel(paths, config.worker_threads, |path| BatchEntry {
        source: path.display().to_string(),
        result: read_map_file(path, config)
            .map(|outcome| MapSummary::from_outcome(&outcome))
            .map_err(|e| e.to_string()),
    });
    finish(entries, start)
}

/// Parse and summarize in-memory documents given as `(name, text)` pairs.
///
/// The file size limit does not apply; documents are already in memory.
pub fn parse_documents(documents: &[(String, String)], config: &ProcessingConfig) -> BatchReport {
    let start = Instant::now();
    let mode = config.mode;
    tracing::info!(
        documents = documents.len(),
        worker_threads = config.worker_threads,
        mode = %mode,
        "Starting document batch"
    );

    let entries = run_parallel(documents, config.worker_threads, |(name, text)| BatchEntry {
        source: name.clone(),
        result: parse_str(text, mode)
            .map(|outcome| MapSummary::from_outcome(&outcome))
            .map_err(|e| e.to_string()),
    });
    finish(entries, start)
}
