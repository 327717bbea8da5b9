// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SMAP-Lite Core Parser
//!
//! Normalizes SEER robot navigation maps (`.smap`, protobuf-style JSON) into
//! a strongly typed [`SmapData`] model.
//!
//! ## Overview
//!
//! - **Field Resolver**: alias-aware lookup of logical fields ([`schema`])
//! - **Value Coercer**: numeric strings, typed property values
//! - **Entity Builders**: one per entity kind, each failing in isolation
//! - **Document Normalizer**: section traversal, bounds and counts
//! - **Diagnostics**: non-fatal issues attached to flexible results
//!
//! ## Quick Start
//!
//! ```rust
//! use smap_lite_core::{parse_str, ParseMode};
//!
//! let text = r#"{
//!     "header": {"mapName": "floor1", "resolution": 0.05},
//!     "normalPosList": [{"x": 0, "y": 0}, {"x": 10, "y": 5}]
//! }"#;
//!
//! let outcome = parse_str(text, ParseMode::Flexible).unwrap();
//! assert_eq!(outcome.data.counts().normal_points, 2);
//! assert!(outcome.diagnostics.is_empty());
//! ```
//!
//! ## Modes
//!
//! [`ParseMode::Standard`] accepts canonical keys only and fails on the first
//! missing-required or malformed entity. [`ParseMode::Flexible`] accepts key
//! aliases, drops bad entities and reports them as [`Diagnostic`]s; it only
//! fails when the input is not a JSON object.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the map model

mod builders;
mod canonical;
pub mod coerce;
mod context;
pub mod diagnostics;
pub mod error;
pub mod mode;
pub mod model;
pub mod model_bounds;
pub mod normalizer;
pub mod resolver;
pub mod schema;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use mode::ParseMode;
pub use model::{
    AdvancedArea, AdvancedCurve, AdvancedEntity, AdvancedLine, AdvancedPoint, MapCounts,
    MapHeader, MapLine, Position, Property, PropertyType, PropertyValue, ReflectorPoint, SmapData,
};
pub use model_bounds::{scan_map_bounds, Bounds, BoundsAccumulator};
pub use normalizer::{
    parse, parse_flexible, parse_standard, parse_str, Normalizer, ParseOutcome, ParseState,
};
pub use resolver::{resolve, Lookup};
pub use schema::{Fallback, FieldSpec, Policy};
