// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch parsing over a directory of map files.

use smap_lite_core::ParseMode;
use smap_lite_processing::{find_map_files, parse_batch, ProcessingConfig};
use std::fs;
use tracing_subscriber::EnvFilter;

/// Log to the test harness when RUST_LOG is set
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const FLOOR: &str = r#"{
    "header": {"mapType": "2D-Map", "mapName": "floor1", "resolution": 0.02},
    "normalPosList": [{"x": 0, "y": 0}, {"x": 10, "y": 5}],
    "advancedPointList": [
        {"className": "LandMark", "instanceName": "LM1", "pos": {"x": 1, "y": 1}}
    ]
}"#;

const LEGACY: &str = r#"{
    "mapHeader": {"name": "legacy", "res": "0.05"},
    "points": [[2, 2], [4, 4]]
}"#;

#[test]
fn test_batch_over_directory() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("floor1.smap"), FLOOR).unwrap();
    fs::write(dir.path().join("legacy.smap"), LEGACY).unwrap();
    fs::write(dir.path().join("broken.smap"), "{\"header\":").unwrap();
    fs::write(dir.path().join("readme.md"), "maps").unwrap();

    let config = ProcessingConfig {
        worker_threads: 2,
        ..ProcessingConfig::default()
    };
    let files = find_map_files(dir.path(), &config.extension).unwrap();
    assert_eq!(files.len(), 3);

    let report = parse_batch(&files, &config);
    assert_eq!(report.entries.len(), 3);
    assert!(report.entries[0].source.ends_with("broken.smap"));
    assert!(!report.entries[0].is_ok());

    let summaries: Vec<_> = report.succeeded().map(|(_, s)| s).collect();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "floor1");
    assert_eq!(summaries[0].counts.advanced_points, 1);
    assert_eq!(summaries[0].max, [10.0, 5.0]);
    assert_eq!(summaries[1].name, "legacy");
    assert_eq!(summaries[1].min, [2.0, 2.0]);
    assert_eq!(summaries[1].warning_count, 0);

    let strict = parse_batch(&files, &config.clone().with_mode(ParseMode::Standard));
    assert_eq!(strict.succeeded().count(), 1);
}

#[test]
fn test_report_serializes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor1.smap");
    fs::write(&path, FLOOR).unwrap();

    let report = parse_batch(&[path], &ProcessingConfig::default());
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["entries"][0]["result"]["Ok"]["mapType"], "2D-Map");
    assert_eq!(value["entries"][0]["result"]["Ok"]["counts"]["normalPoints"], 2);
}

#[test]
fn test_config_from_env() {
    std::env::set_var("SMAP_PARSE_MODE", "strict");
    std::env::set_var("WORKER_THREADS", "3");
    std::env::set_var("MAX_FILE_SIZE_MB", "not-a-number");
    std::env::set_var("SMAP_EXTENSION", ".json");

    let config = ProcessingConfig::from_env();
    assert_eq!(config.mode, ParseMode::Standard);
    assert_eq!(config.worker_threads, 3);
    assert_eq!(config.max_file_size_mb, 100);
    assert_eq!(config.extension, "json");

    for key in ["SMAP_PARSE_MODE", "WORKER_THREADS", "MAX_FILE_SIZE_MB", "SMAP_EXTENSION"] {
        std::env::remove_var(key);
    }
}
