// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SMAP-Lite Processing
//!
//! Batch layer over [`smap_lite_core`]: finds `.smap` files, parses them in
//! parallel with rayon and produces serializable [`MapSummary`] payloads.
//!
//! ```rust,ignore
//! use smap_lite_processing::{find_map_files, parse_batch, ProcessingConfig};
//!
//! let config = ProcessingConfig::from_env();
//! let files = find_map_files("maps".as_ref(), &config.extension)?;
//! let report = parse_batch(&files, &config);
//! for (source, summary) in report.succeeded() {
//!     println!("{source}: {} entities", summary.entity_count());
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod reader;
pub mod summary;

pub use batch::{parse_batch, parse_documents, BatchEntry, BatchReport};
pub use config::ProcessingConfig;
pub use error::{ProcessingError, Result};
pub use reader::{find_map_files, read_map_file};
pub use summary::{EntityCounts, MapSummary};
